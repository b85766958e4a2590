//! Integration tests for `jprm-release build` against a fake jprm

use crate::helpers::*;
use anyhow::Result;

fn stderr(output: &std::process::Output) -> String {
  String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_build_registers_package() -> Result<()> {
  let plugin = TestPlugin::new()?;
  plugin.tag("JellyfinPlugin/v1.2.3")?;
  plugin.install_fake_jprm(0, 0)?;

  let output = run_release(&plugin.path, &["build"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("Package path: artifacts/shizou_1.2.3.zip"));

  let calls = plugin.jprm_calls()?;
  assert_eq!(calls.len(), 2, "expected build and repo add, got {:?}", calls);
  assert!(calls[0].starts_with("-v debug plugin build --dotnet-framework net6.0 --max-cpu-count "));
  assert!(calls[0].ends_with("--version 1.2.3 --output artifacts"));
  assert_eq!(
    calls[1],
    "-v debug repo add -U https://github.com/Mik1ll/Shizou/releases/download/JellyfinPlugin/v1.2.3/shizou_1.2.3.zip Repository/manifest.json artifacts/shizou_1.2.3.zip"
  );

  assert!(plugin.file_exists("artifacts/shizou_1.2.3.zip"));
  Ok(())
}

#[test]
fn test_build_patches_metadata_during_build_only() -> Result<()> {
  let plugin = TestPlugin::new()?;
  plugin.tag("JellyfinPlugin/v1.2.3")?;
  plugin.install_fake_jprm(0, 0)?;

  run_release(&plugin.path, &["build"])?;

  // What jprm saw while building
  let seen: serde_yaml::Mapping = serde_yaml::from_str(&plugin.read_file("jprm.yaml.seen")?)?;
  assert_eq!(seen.get("targetAbi"), Some(&serde_yaml::Value::from("10.8.0.0")));
  assert_eq!(seen.get("changelog"), Some(&serde_yaml::Value::from("")));
  let keys: Vec<_> = seen.keys().filter_map(|k| k.as_str()).collect();
  assert_eq!(keys, vec!["name", "guid", "version", "overview", "targetAbi", "changelog"]);

  // And what is left afterwards
  assert_eq!(plugin.read_file("jprm.yaml")?, METADATA);
  Ok(())
}

#[test]
fn test_build_uses_latest_matching_tag() -> Result<()> {
  let plugin = TestPlugin::new()?;
  plugin.tag("JellyfinPlugin/v1.0.0")?;
  plugin.commit("Second release")?;
  plugin.tag("JellyfinPlugin/v1.1.0")?;
  plugin.tag("Server/v9.9.9")?;
  plugin.install_fake_jprm(0, 0)?;

  run_release(&plugin.path, &["build"])?;

  let calls = plugin.jprm_calls()?;
  assert!(calls[0].contains("--version 1.1.0"));
  assert!(calls[1].contains("/releases/download/JellyfinPlugin/v1.1.0/shizou_1.1.0.zip"));
  Ok(())
}

#[test]
fn test_build_failure_stops_before_registration() -> Result<()> {
  let plugin = TestPlugin::new()?;
  plugin.tag("JellyfinPlugin/v1.2.3")?;
  plugin.install_fake_jprm(2, 0)?;

  let output = run_release_unchecked(&plugin.path, &["build"])?;
  assert!(!output.status.success());
  assert!(stderr(&output).contains("Jprm build returned error code: 2"));

  let calls = plugin.jprm_calls()?;
  assert_eq!(calls.len(), 1, "repo add must not run after a failed build");

  // Restoration is never reached by default
  assert!(plugin.read_file("jprm.yaml")?.contains("targetAbi"));
  Ok(())
}

#[test]
fn test_build_failure_restores_with_flag() -> Result<()> {
  let plugin = TestPlugin::new()?;
  plugin.tag("JellyfinPlugin/v1.2.3")?;
  plugin.install_fake_jprm(1, 0)?;

  let output = run_release_unchecked(&plugin.path, &["build", "--restore-on-failure"])?;
  assert!(!output.status.success());
  assert_eq!(plugin.jprm_calls()?.len(), 1);
  assert_eq!(plugin.read_file("jprm.yaml")?, METADATA);
  Ok(())
}

#[test]
fn test_build_failure_restores_with_config() -> Result<()> {
  let plugin = TestPlugin::new()?;
  plugin.tag("JellyfinPlugin/v1.2.3")?;
  plugin.install_fake_jprm(1, 0)?;
  let config = plugin.read_file("jprm-release.toml")?;
  plugin.write_config(&format!("{}\n[metadata]\nrestore_on_failure = true\n", config))?;

  let output = run_release_unchecked(&plugin.path, &["build"])?;
  assert!(!output.status.success());
  assert_eq!(plugin.read_file("jprm.yaml")?, METADATA);
  Ok(())
}

#[test]
fn test_repo_add_failure_reports_code() -> Result<()> {
  let plugin = TestPlugin::new()?;
  plugin.tag("JellyfinPlugin/v1.2.3")?;
  plugin.install_fake_jprm(0, 5)?;

  let output = run_release_unchecked(&plugin.path, &["build"])?;
  assert!(!output.status.success());
  assert!(stderr(&output).contains("Jprm repo add returned error code: 5"));

  // Metadata was already restored before registration
  assert_eq!(plugin.read_file("jprm.yaml")?, METADATA);
  Ok(())
}

#[test]
fn test_missing_tag_is_fatal() -> Result<()> {
  let plugin = TestPlugin::new()?;
  plugin.tag("v1.2.3")?;
  plugin.install_fake_jprm(0, 0)?;

  let output = run_release_unchecked(&plugin.path, &["build"])?;
  assert!(!output.status.success());
  assert!(stderr(&output).contains("Git describe returned error code"));
  assert!(plugin.jprm_calls()?.is_empty());
  assert_eq!(plugin.read_file("jprm.yaml")?, METADATA);
  Ok(())
}

#[test]
fn test_output_path_file_is_fatal() -> Result<()> {
  let plugin = TestPlugin::new()?;
  plugin.tag("JellyfinPlugin/v1.2.3")?;
  plugin.install_fake_jprm(0, 0)?;
  std::fs::write(plugin.path.join("artifacts"), "oops")?;

  let output = run_release_unchecked(&plugin.path, &["build"])?;
  assert!(!output.status.success());
  assert!(stderr(&output).contains("is not a directory"));
  assert!(plugin.jprm_calls()?.is_empty());
  assert_eq!(plugin.read_file("jprm.yaml")?, METADATA);
  Ok(())
}

#[test]
fn test_empty_metadata_is_fatal() -> Result<()> {
  let plugin = TestPlugin::new()?;
  plugin.tag("JellyfinPlugin/v1.2.3")?;
  plugin.install_fake_jprm(0, 0)?;
  std::fs::write(plugin.path.join("jprm.yaml"), "")?;

  let output = run_release_unchecked(&plugin.path, &["build"])?;
  assert!(!output.status.success());
  assert!(stderr(&output).contains("Failed to load any metadata from"));
  assert!(plugin.jprm_calls()?.is_empty());
  Ok(())
}

#[test]
fn test_missing_abi_reference_is_fatal() -> Result<()> {
  let plugin = TestPlugin::new()?;
  plugin.tag("JellyfinPlugin/v1.2.3")?;
  plugin.install_fake_jprm(0, 0)?;
  std::fs::write(
    plugin.path.join("Shizou.JellyfinPlugin.csproj"),
    "<Project><PropertyGroup><TargetFramework>net6.0</TargetFramework></PropertyGroup></Project>\n",
  )?;

  let output = run_release_unchecked(&plugin.path, &["build"])?;
  assert!(!output.status.success());
  assert!(stderr(&output).contains("Failed to get Jellyfin.Controller package reference version in csproj"));
  assert!(plugin.jprm_calls()?.is_empty());
  assert_eq!(plugin.read_file("jprm.yaml")?, METADATA);
  Ok(())
}

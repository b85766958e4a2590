//! Integration tests for `jprm-release plan`

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_plan_json_output() -> Result<()> {
  let plugin = TestPlugin::new()?;
  plugin.tag("JellyfinPlugin/v1.2.3")?;

  let output = run_release(&plugin.path, &["plan", "--json"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  let json: serde_json::Value = serde_json::from_str(&stdout)?;

  assert_eq!(json["tag"], "JellyfinPlugin/v1.2.3");
  assert_eq!(json["version"], "1.2.3");
  assert_eq!(json["framework"], "net6.0");
  assert_eq!(json["target_abi"], "10.8.0.0");
  assert_eq!(
    json["release_url"],
    "https://github.com/Mik1ll/Shizou/releases/download/JellyfinPlugin/v1.2.3"
  );
  assert_eq!(json["metadata_has_transient_keys"], false);

  let build_command = json["build_command"].as_str().unwrap_or_default();
  assert!(build_command.starts_with("jprm -v debug plugin build --dotnet-framework net6.0"));
  assert!(build_command.ends_with("--version 1.2.3 --output artifacts"));

  Ok(())
}

#[test]
fn test_plan_touches_nothing() -> Result<()> {
  let plugin = TestPlugin::new()?;
  plugin.tag("JellyfinPlugin/v2.0.0")?;

  let output = run_release(&plugin.path, &["plan"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("Version:    2.0.0"));
  assert!(stdout.contains("Target ABI: 10.8.0.0"));

  assert_eq!(plugin.read_file("jprm.yaml")?, METADATA);
  assert!(!plugin.file_exists("artifacts"));
  Ok(())
}

#[test]
fn test_plan_warns_about_committed_transient_keys() -> Result<()> {
  let plugin = TestPlugin::new()?;
  plugin.tag("JellyfinPlugin/v1.2.3")?;
  std::fs::write(
    plugin.path.join("jprm.yaml"),
    format!("{}targetAbi: \"10.7.0.0\"\n", METADATA),
  )?;

  let output = run_release(&plugin.path, &["plan"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("already contains targetAbi/changelog"));
  Ok(())
}

#[test]
fn test_plan_with_custom_config() -> Result<()> {
  let plugin = TestPlugin::new()?;
  plugin.tag("plugin-3.1.4")?;
  plugin.write_config(
    r#"
[git]
tag_pattern = "plugin-[0-9]*"
version_prefix = "-"

[repository]
url = "https://example.org/acme/plugin/"
"#,
  )?;

  let output = run_release(&plugin.path, &["plan", "--json"])?;
  let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  assert_eq!(json["version"], "3.1.4");
  assert_eq!(
    json["release_url"],
    "https://example.org/acme/plugin/releases/download/plugin-3.1.4"
  );
  Ok(())
}

#[test]
fn test_plan_from_other_directory() -> Result<()> {
  let plugin = TestPlugin::new()?;
  plugin.tag("JellyfinPlugin/v1.2.3")?;
  let elsewhere = tempfile::TempDir::new()?;
  let dir = plugin.path.to_string_lossy().to_string();

  let output = run_release(elsewhere.path(), &["-C", &dir, "plan", "--json"])?;
  let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  assert_eq!(json["version"], "1.2.3");
  Ok(())
}

#[test]
fn test_plan_resolves_tag_through_git_dir() -> Result<()> {
  let plugin = TestPlugin::new()?;
  plugin.tag("JellyfinPlugin/v1.2.3")?;

  let export = tempfile::TempDir::new()?;
  std::fs::write(export.path().join("Shizou.JellyfinPlugin.csproj"), CSPROJ)?;
  std::fs::write(export.path().join("jprm.yaml"), METADATA)?;
  let git_dir = plugin.path.join(".git");

  let output = run_release_with_env(export.path(), &["plan", "--json"], &[("GIT_DIR", &git_dir)])?;
  assert!(
    output.status.success(),
    "stderr: {}",
    String::from_utf8_lossy(&output.stderr)
  );
  let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  assert_eq!(json["tag"], "JellyfinPlugin/v1.2.3");
  assert_eq!(json["version"], "1.2.3");
  Ok(())
}

#[test]
fn test_plan_missing_descriptor() -> Result<()> {
  let plugin = TestPlugin::new()?;
  plugin.tag("JellyfinPlugin/v1.2.3")?;
  std::fs::remove_file(plugin.path.join("Shizou.JellyfinPlugin.csproj"))?;

  let output = run_release_unchecked(&plugin.path, &["plan"])?;
  assert!(!output.status.success());
  assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read project file"));
  Ok(())
}

#[test]
fn test_explicit_config_must_exist() -> Result<()> {
  let plugin = TestPlugin::new()?;
  plugin.tag("JellyfinPlugin/v1.2.3")?;

  let output = run_release_unchecked(&plugin.path, &["--config", "missing.toml", "plan"])?;
  assert!(!output.status.success());
  assert!(String::from_utf8_lossy(&output.stderr).contains("Config file not found"));
  Ok(())
}

//! jprm (Jellyfin Plugin Repository Manager) invocation
//!
//! Two subcommands are used:
//! - `plugin build`: builds and zips the plugin, printing the archive path on stdout
//! - `repo add`: appends the archive to a repository manifest

use crate::core::config::JprmConfig;
use crate::core::error::{DataError, ReleaseResult, ToolError};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Parameters for `jprm plugin build`
#[derive(Debug, Clone)]
pub struct BuildRequest<'a> {
  pub framework: &'a str,
  pub max_cpu_count: usize,
  pub version: &'a str,
  pub output_dir: &'a Path,
}

/// jprm runner bound to a working directory
#[derive(Debug, Clone)]
pub struct Jprm {
  program: String,
  verbosity: String,
  work_dir: PathBuf,
}

impl Jprm {
  pub fn new(config: &JprmConfig, work_dir: &Path) -> Self {
    Self {
      program: config.program.clone(),
      verbosity: config.verbosity.clone(),
      work_dir: work_dir.to_path_buf(),
    }
  }

  pub fn program(&self) -> &str {
    &self.program
  }

  /// Arguments for `plugin build`
  pub fn build_args(&self, request: &BuildRequest<'_>) -> Vec<OsString> {
    let cpus = request.max_cpu_count.to_string();
    let mut args = self.base_args();
    args.extend(
      [
        "plugin",
        "build",
        "--dotnet-framework",
        request.framework,
        "--max-cpu-count",
        cpus.as_str(),
        "--version",
        request.version,
        "--output",
      ]
      .map(OsString::from),
    );
    args.push(request.output_dir.as_os_str().to_os_string());
    args
  }

  /// Arguments for `repo add`
  pub fn repo_add_args(&self, url: &str, manifest: &Path, archive: &Path) -> Vec<OsString> {
    let mut args = self.base_args();
    args.extend(["repo", "add", "-U", url].map(OsString::from));
    args.push(manifest.as_os_str().to_os_string());
    args.push(archive.as_os_str().to_os_string());
    args
  }

  /// Build the plugin and return the archive path jprm reports
  ///
  /// Only stdout is captured; jprm's log output on stderr goes straight to the terminal.
  /// A non-zero exit is reported by code alone.
  pub fn plugin_build(&self, request: &BuildRequest<'_>) -> ReleaseResult<PathBuf> {
    let args = self.build_args(request);
    tracing::debug!("running {} {}", self.program, display_args(&args));

    let output = self
      .command()
      .args(&args)
      .stdout(Stdio::piped())
      .stderr(Stdio::inherit())
      .output()
      .map_err(|e| self.spawn_error(e))?;

    if !output.status.success() {
      return Err(
        ToolError::Build {
          code: output.status.code().unwrap_or(-1),
        }
        .into(),
      );
    }

    archive_path_from_output(&String::from_utf8_lossy(&output.stdout))
  }

  /// Register an archive in the manifest under `url`
  pub fn repo_add(&self, url: &str, manifest: &Path, archive: &Path) -> ReleaseResult<()> {
    let args = self.repo_add_args(url, manifest, archive);
    tracing::debug!("running {} {}", self.program, display_args(&args));

    let status = self.command().args(&args).status().map_err(|e| self.spawn_error(e))?;

    if !status.success() {
      return Err(
        ToolError::RepoAdd {
          code: status.code().unwrap_or(-1),
        }
        .into(),
      );
    }

    Ok(())
  }

  fn base_args(&self) -> Vec<OsString> {
    vec![OsString::from("-v"), OsString::from(&self.verbosity)]
  }

  fn command(&self) -> Command {
    let mut cmd = Command::new(&self.program);
    cmd.current_dir(&self.work_dir);
    cmd
  }

  fn spawn_error(&self, e: std::io::Error) -> ToolError {
    ToolError::Spawn {
      program: self.program.clone(),
      reason: e.to_string(),
    }
  }
}

/// Archive path from `plugin build` stdout: the last line, trimmed
pub fn archive_path_from_output(stdout: &str) -> ReleaseResult<PathBuf> {
  let last = stdout.trim().lines().last().map(str::trim).unwrap_or_default();
  if last.is_empty() {
    return Err(DataError::MissingArchivePath.into());
  }
  Ok(PathBuf::from(last))
}

/// Space-joined arguments for logs and dry output
pub fn display_args(args: &[OsString]) -> String {
  args
    .iter()
    .map(|a| a.to_string_lossy().into_owned())
    .collect::<Vec<_>>()
    .join(" ")
}

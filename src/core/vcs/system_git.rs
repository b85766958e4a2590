//! System git backend
//!
//! Shells out to the git binary for the single query the release flow needs:
//! the most recent tag matching a pattern.

use crate::core::error::{ReleaseResult, ToolError};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git backend using the system git executable
#[derive(Debug, Clone)]
pub struct SystemGit {
  /// git executable name or path
  program: String,

  /// Repository working directory
  repo_path: PathBuf,
}

impl SystemGit {
  /// Create a backend for a repository directory. No subprocess is run until a query is made.
  pub fn new(program: impl Into<String>, path: &Path) -> Self {
    Self {
      program: program.into(),
      repo_path: path.to_path_buf(),
    }
  }

  /// Most recent tag reachable from HEAD matching `pattern`
  ///
  /// Runs `git describe --match=<pattern> --tags --abbrev=0`. A non-zero exit is
  /// reported together with git's stderr.
  pub fn describe_tag(&self, pattern: &str) -> ReleaseResult<String> {
    let match_arg = format!("--match={}", pattern);
    let args = ["describe", match_arg.as_str(), "--tags", "--abbrev=0"];
    tracing::debug!("running {} {}", self.program, args.join(" "));

    let output = self.git_cmd().args(args).output().map_err(|e| ToolError::Spawn {
      program: self.program.clone(),
      reason: e.to_string(),
    })?;

    if !output.status.success() {
      return Err(
        ToolError::Describe {
          code: output.status.code().unwrap_or(-1),
          stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
        .into(),
      );
    }

    let tag = String::from_utf8_lossy(&output.stdout).trim().to_string();
    tracing::debug!("git describe resolved tag {}", tag);
    Ok(tag)
  }

  /// git command rooted at the repo path
  ///
  /// The process environment is inherited, so `GIT_DIR`, `GIT_WORK_TREE` and
  /// user config apply as they would to a plain `git describe`.
  fn git_cmd(&self) -> Command {
    let mut cmd = Command::new(&self.program);

    cmd.arg("-C").arg(&self.repo_path);
    cmd.arg("-c").arg("core.quotePath=false");

    cmd
  }
}

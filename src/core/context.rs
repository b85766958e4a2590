//! Release context - build once, pass everywhere
//!
//! The working directory and the loaded config are resolved once in main.rs and
//! passed by reference to every command. All relative paths from the config are
//! resolved against `root` so the pipeline never depends on the process cwd.

use crate::core::config::ReleaseConfig;
use crate::core::error::ReleaseResult;
use std::path::{Path, PathBuf};

/// Shared state for a single jprm-release invocation.
#[derive(Debug, Clone)]
pub struct ReleaseContext {
  /// Plugin project directory (absolute path)
  pub root: PathBuf,

  /// Loaded or default configuration
  pub config: ReleaseConfig,
}

impl ReleaseContext {
  /// Build the context for a working directory.
  ///
  /// `config_path` is an explicit config file; without it the usual search
  /// locations are tried and defaults are used when none exist.
  pub fn build(work_dir: &Path, config_path: Option<&Path>) -> ReleaseResult<Self> {
    let root = std::path::absolute(work_dir)?;
    let config = ReleaseConfig::load(&root, config_path)?;
    Ok(Self { root, config })
  }

  /// Resolve a config path against the working directory
  pub fn resolve(&self, path: &Path) -> PathBuf {
    self.root.join(path)
  }

  pub fn descriptor_path(&self) -> PathBuf {
    self.resolve(&self.config.project.descriptor)
  }

  pub fn metadata_path(&self) -> PathBuf {
    self.resolve(&self.config.metadata.file)
  }

  pub fn output_dir(&self) -> PathBuf {
    self.resolve(&self.config.jprm.output_dir)
  }
}

//! Release planning: everything the build needs, computed before anything runs
//!
//! Uses existing infrastructure:
//! - SystemGit for the release tag
//! - ProjectDescriptor for framework and target ABI

use crate::core::context::ReleaseContext;
use crate::core::error::{ReleaseError, ReleaseResult};
use crate::project::ProjectDescriptor;
use crate::release::version::ReleaseVersion;
use crate::utils::cpu_count;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Parameters for a single plugin release
#[derive(Debug, Clone, Serialize)]
pub struct ReleasePlan {
  #[serde(flatten)]
  pub version: ReleaseVersion,

  #[serde(flatten)]
  pub project: ProjectDescriptor,

  pub max_cpu_count: usize,

  /// Paths as passed to jprm, relative to the working directory
  pub metadata: PathBuf,
  pub output_dir: PathBuf,
  pub manifest: PathBuf,

  /// Download URL prefix; the archive file name is appended after the build
  pub release_url: String,
}

impl ReleasePlan {
  /// Resolve the version tag and read the project descriptor
  pub fn prepare(ctx: &ReleaseContext) -> ReleaseResult<Self> {
    let config = &ctx.config;
    let version = ReleaseVersion::resolve(&ctx.root, &config.git)?;
    let project = ProjectDescriptor::load(&ctx.descriptor_path(), &config.project.abi_package)?;

    Ok(Self {
      release_url: release_url(&config.repository.url, &version.tag),
      version,
      project,
      max_cpu_count: cpu_count(),
      metadata: config.metadata.file.clone(),
      output_dir: config.jprm.output_dir.clone(),
      manifest: config.repository.manifest.clone(),
    })
  }

  /// Public download URL of a built archive
  pub fn download_url(&self, archive: &Path) -> ReleaseResult<String> {
    let file_name = archive
      .file_name()
      .ok_or_else(|| ReleaseError::message(format!("Package path has no file name: {}", archive.display())))?;
    Ok(format!("{}/{}", self.release_url, file_name.to_string_lossy()))
  }
}

/// `<repo>/releases/download/<tag>`
pub fn release_url(repository_url: &str, tag: &str) -> String {
  format!("{}/releases/download/{}", repository_url.trim_end_matches('/'), tag)
}

//! Version resolution from release tags

use crate::core::config::GitConfig;
use crate::core::error::{DataError, ReleaseResult};
use crate::core::vcs::SystemGit;
use serde::Serialize;
use std::path::Path;

/// A release tag and the version it carries
///
/// `JellyfinPlugin/v1.2.3` has tag `JellyfinPlugin/v1.2.3` and version `1.2.3`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseVersion {
  /// Full tag name as reported by git (used in the download URL)
  pub tag: String,

  /// Version substring after the last prefix marker
  pub version: String,
}

impl ReleaseVersion {
  /// Split a tag at the last occurrence of `prefix`
  pub fn from_tag(tag: &str, prefix: &str) -> ReleaseResult<Self> {
    let tag = tag.trim();
    let malformed = || DataError::MalformedTag {
      tag: tag.to_string(),
      prefix: prefix.to_string(),
    };

    let start = tag.rfind(prefix).ok_or_else(malformed)? + prefix.len();
    let version = &tag[start..];
    if version.is_empty() {
      return Err(malformed().into());
    }

    Ok(Self {
      tag: tag.to_string(),
      version: version.to_string(),
    })
  }

  /// Resolve the latest matching tag in a repository
  pub fn resolve(repo: &Path, git: &GitConfig) -> ReleaseResult<Self> {
    let tag = SystemGit::new(git.program.as_str(), repo).describe_tag(&git.tag_pattern)?;
    Self::from_tag(&tag, &git.version_prefix)
  }
}

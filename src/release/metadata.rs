//! Plugin metadata (jprm.yaml) patching and restoration
//!
//! jprm reads `targetAbi` and `changelog` from the metadata file while building.
//! Both are injected just before the build and removed right after it, so the
//! file in the repository keeps its committed shape.
//!
//! Maintains the invariant: after restoration the file holds exactly the original
//! keys and values in their original order, minus the transient keys.

use crate::core::error::{DataError, ReleaseError, ReleaseResult, ResultExt};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub const TARGET_ABI_KEY: &str = "targetAbi";
pub const CHANGELOG_KEY: &str = "changelog";

/// Keys that only exist in the file while jprm is building
const TRANSIENT_KEYS: [&str; 2] = [TARGET_ABI_KEY, CHANGELOG_KEY];

/// Loaded plugin metadata document
#[derive(Debug, Clone)]
pub struct PluginMetadata {
  path: PathBuf,

  /// File content as read, written back verbatim when nothing needs removing
  original: String,

  /// Insertion-ordered top-level mapping
  mapping: Mapping,
}

impl PluginMetadata {
  /// Load metadata from a YAML file
  pub fn load(path: &Path) -> ReleaseResult<Self> {
    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read metadata from {}", path.display()))?;
    Self::parse(path, content)
  }

  /// Parse metadata text that was read from `path`
  pub fn parse(path: &Path, content: String) -> ReleaseResult<Self> {
    let empty = || ReleaseError::Data(DataError::EmptyMetadata { path: path.to_path_buf() });

    if !has_document_content(&content) {
      return Err(empty());
    }

    let value: Value =
      serde_yaml::from_str(&content).with_context(|| format!("Failed to parse metadata in {}", path.display()))?;

    let mapping = match value {
      Value::Null => return Err(empty()),
      Value::Mapping(mapping) => mapping,
      _ => {
        return Err(ReleaseError::Data(DataError::MetadataNotMapping {
          path: path.to_path_buf(),
        }));
      }
    };

    Ok(Self {
      path: path.to_path_buf(),
      original: content,
      mapping,
    })
  }

  /// Whether the committed file already carries any transient key
  pub fn has_transient_keys(&self) -> bool {
    TRANSIENT_KEYS.iter().any(|key| self.mapping.contains_key(*key))
  }

  /// Document text with `targetAbi` set and an empty `changelog`
  ///
  /// Existing keys keep their position; new keys are appended.
  pub fn patched_text(&self, target_abi: &str) -> ReleaseResult<String> {
    let mut patched = self.mapping.clone();
    patched.insert(Value::from(TARGET_ABI_KEY), Value::from(target_abi));
    patched.insert(Value::from(CHANGELOG_KEY), Value::from(""));
    Ok(serde_yaml::to_string(&patched)?)
  }

  /// Document text with the transient keys removed
  pub fn restored_text(&self) -> ReleaseResult<String> {
    if !self.has_transient_keys() {
      return Ok(self.original.clone());
    }

    let mut restored = self.mapping.clone();
    for key in TRANSIENT_KEYS {
      // shift_remove keeps the order of the remaining keys
      restored.shift_remove(key);
    }
    Ok(serde_yaml::to_string(&restored)?)
  }

  /// Write the patched document to disk
  pub fn patch(&self, target_abi: &str) -> ReleaseResult<()> {
    let text = self.patched_text(target_abi)?;
    tracing::debug!("patching {} with {}={}", self.path.display(), TARGET_ABI_KEY, target_abi);
    self.write(&text)
  }

  /// Write the restored document to disk
  pub fn restore(&self) -> ReleaseResult<()> {
    let text = self.restored_text()?;
    tracing::debug!("restoring {}", self.path.display());
    self.write(&text)
  }

  /// Patch the file and return a guard that owns its restoration
  ///
  /// With `restore_on_drop` the guard restores the file if it is dropped before
  /// [`PatchGuard::restore`] is called, e.g. when a later step returns an error.
  pub fn patch_scoped(&self, target_abi: &str, restore_on_drop: bool) -> ReleaseResult<PatchGuard<'_>> {
    self.patch(target_abi)?;
    Ok(PatchGuard {
      metadata: self,
      armed: restore_on_drop,
    })
  }

  fn write(&self, text: &str) -> ReleaseResult<()> {
    fs::write(&self.path, text).with_context(|| format!("Failed to write metadata to {}", self.path.display()))
  }
}

/// Pending restoration of a patched metadata file
#[derive(Debug)]
#[must_use = "dropping the guard skips the explicit restore step"]
pub struct PatchGuard<'a> {
  metadata: &'a PluginMetadata,
  armed: bool,
}

impl PatchGuard<'_> {
  /// Restore the metadata file now
  pub fn restore(mut self) -> ReleaseResult<()> {
    self.armed = false;
    self.metadata.restore()
  }
}

impl Drop for PatchGuard<'_> {
  fn drop(&mut self) {
    if !self.armed {
      return;
    }
    tracing::warn!("restoring {} after failure", self.metadata.path.display());
    if let Err(e) = self.metadata.restore() {
      tracing::error!("failed to restore {}: {}", self.metadata.path.display(), e);
    }
  }
}

/// False for files holding only blank lines, comments and document markers
fn has_document_content(content: &str) -> bool {
  content.lines().map(str::trim).any(|line| {
    !(line.is_empty() || line.starts_with('#') || line == "---" || line == "...")
  })
}

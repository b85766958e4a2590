//! Host and filesystem helpers

use crate::core::error::{FsError, ReleaseResult, ResultExt};
use std::fs;
use std::path::Path;

/// Number of CPUs to hand to jprm's `--max-cpu-count`, 1 if detection fails
pub fn cpu_count() -> usize {
  std::thread::available_parallelism()
    .map(|n| n.get())
    .unwrap_or_else(|e| {
      tracing::debug!("could not detect CPU count ({}), using 1", e);
      1
    })
}

/// Create the output directory if absent
///
/// An existing directory is reused. An existing non-directory is an error.
pub fn ensure_output_dir(path: &Path) -> ReleaseResult<()> {
  if path.exists() && !path.is_dir() {
    return Err(FsError::NotADirectory { path: path.to_path_buf() }.into());
  }

  fs::create_dir_all(path).with_context(|| format!("Failed to create output directory {}", path.display()))?;
  Ok(())
}

//! Plugin release orchestration
//!
//! # Pipeline
//!
//! ```text
//! Resolve Version -> Read Descriptor -> Patch Metadata -> Build Package
//!   -> Restore Metadata -> Register in Manifest -> Done
//! ```
//!
//! Every step is fatal on failure. Nothing already done is rolled back, with one
//! opt-in exception: `restore_on_failure` puts the metadata file back when a step
//! after patching fails.
//!
//! - **version**: release tag lookup and version extraction
//! - **plan**: computed build parameters and download URLs
//! - **metadata**: jprm.yaml patching and restoration

pub mod metadata;
pub mod plan;
pub mod version;

pub use metadata::PluginMetadata;
pub use plan::ReleasePlan;

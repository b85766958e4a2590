//! CLI commands for jprm-release
//!
//! - **build**: Full release pipeline (tag → build → manifest)
//! - **plan**: Show the computed release parameters without building
//!
//! All commands accept `&ReleaseContext` so config is loaded once.

pub mod build;
pub mod plan;

pub use build::run_build;
pub use plan::run_plan;

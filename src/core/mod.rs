//! Core building blocks for jprm-release
//!
//! - **config**: jprm-release.toml parsing, defaults and validation
//! - **context**: Working directory and config shared by all commands
//! - **error**: Error types with contextual help messages
//! - **vcs**: Git operations (SystemGit)

pub mod config;
pub mod context;
pub mod error;
pub mod vcs;

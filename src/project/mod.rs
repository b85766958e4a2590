//! Plugin project inspection
//!
//! Reads the build parameters jprm needs from the MSBuild project file.

pub mod descriptor;

pub use descriptor::ProjectDescriptor;

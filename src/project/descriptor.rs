//! MSBuild project descriptor (.csproj) reading
//!
//! Only two values are needed for a jprm build, so the file is matched with
//! regular expressions rather than parsed as XML:
//!
//! - the first entry of `<TargetFramework(s)>`
//! - the `Version` of the self-closing `<PackageReference>` for the ABI package

use crate::core::error::{DataError, ReleaseResult, ResultExt};
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::fs;
use std::path::Path;

const TARGET_FRAMEWORKS: &str = r"<TargetFrameworks?>(.*?)</TargetFrameworks?>";

/// Self-closing package reference, attributes captured
///
/// `>` may appear unescaped inside attribute values (MSBuild conditions), `<` may not.
const PACKAGE_REFERENCE: &str = r"<PackageReference\s([^<]*?)/>";

const VERSION_ATTR: &str = r#"\bVersion\s*=\s*"([^"]*)""#;

/// Build parameters extracted from the project descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectDescriptor {
  /// First target framework moniker, e.g. `net6.0`
  pub framework: String,

  /// Referenced ABI package version with a fourth `.0` component
  pub target_abi: String,
}

impl ProjectDescriptor {
  /// Read and extract a descriptor file
  pub fn load(path: &Path, abi_package: &str) -> ReleaseResult<Self> {
    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read project file {}", path.display()))?;
    let descriptor = Self::parse(&content, abi_package)?;
    tracing::debug!(
      "{}: framework={} targetAbi={}",
      path.display(),
      descriptor.framework,
      descriptor.target_abi
    );
    Ok(descriptor)
  }

  /// Extract framework and target ABI from descriptor text
  pub fn parse(content: &str, abi_package: &str) -> ReleaseResult<Self> {
    let framework = target_framework(content)?.ok_or(DataError::MissingFramework)?;
    let version = package_version(content, abi_package)?.ok_or_else(|| DataError::MissingTargetAbi {
      package: abi_package.to_string(),
    })?;

    Ok(Self {
      framework,
      target_abi: format!("{}.0", version),
    })
  }
}

/// First framework in the first `<TargetFramework(s)>` element
fn target_framework(content: &str) -> ReleaseResult<Option<String>> {
  let frameworks = pattern(TARGET_FRAMEWORKS)?;

  let first = frameworks
    .captures(content)
    .and_then(|caps| caps.get(1))
    .and_then(|list| list.as_str().split(';').next())
    .map(str::trim)
    .filter(|fw| !fw.is_empty())
    .map(str::to_string);

  Ok(first)
}

/// Version of the first self-closing reference to `package`
fn package_version(content: &str, package: &str) -> ReleaseResult<Option<String>> {
  let reference = pattern(PACKAGE_REFERENCE)?;
  let version_attr = pattern(VERSION_ATTR)?;
  let include = pattern(&format!(r#"\bInclude\s*=\s*"{}""#, regex::escape(package)))?;

  let version = reference
    .captures_iter(content)
    .filter_map(|caps| caps.get(1))
    .map(|attrs| attrs.as_str())
    .filter(|attrs| include.is_match(attrs))
    .find_map(|attrs| version_attr.captures(attrs).and_then(|v| v.get(1)))
    .map(|v| v.as_str().to_string());

  Ok(version)
}

fn pattern(source: &str) -> ReleaseResult<Regex> {
  Ok(RegexBuilder::new(source).case_insensitive(true).build()?)
}

use crate::core::error::{ConfigError, ReleaseError, ReleaseResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for jprm-release
/// Searched in order: jprm-release.toml, .jprm-release.toml, .config/jprm-release.toml
///
/// Every field is optional. The defaults build the Shizou Jellyfin plugin.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseConfig {
  #[serde(default)]
  pub git: GitConfig,
  #[serde(default)]
  pub project: ProjectConfig,
  #[serde(default)]
  pub metadata: MetadataConfig,
  #[serde(default)]
  pub jprm: JprmConfig,
  #[serde(default)]
  pub repository: RepositoryConfig,
}

/// Version resolution from release tags
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
  /// git executable
  pub program: String,

  /// Glob passed to `git describe --match`
  pub tag_pattern: String,

  /// Marker preceding the version inside the tag (last occurrence wins)
  pub version_prefix: String,
}

impl Default for GitConfig {
  fn default() -> Self {
    Self {
      program: "git".to_string(),
      tag_pattern: "JellyfinPlugin/v[0-9]*.[0-9]*.[0-9]*".to_string(),
      version_prefix: "/v".to_string(),
    }
  }
}

/// Project descriptor (.csproj) location and ABI package
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
  pub descriptor: PathBuf,

  /// Package whose referenced version determines the target ABI
  pub abi_package: String,
}

impl Default for ProjectConfig {
  fn default() -> Self {
    Self {
      descriptor: PathBuf::from("Shizou.JellyfinPlugin.csproj"),
      abi_package: "Jellyfin.Controller".to_string(),
    }
  }
}

/// Plugin metadata file patched around the build
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
  pub file: PathBuf,

  /// Restore the metadata even when a later step fails
  pub restore_on_failure: bool,
}

impl Default for MetadataConfig {
  fn default() -> Self {
    Self {
      file: PathBuf::from("jprm.yaml"),
      restore_on_failure: false,
    }
  }
}

/// Packaging tool invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JprmConfig {
  pub program: String,

  /// Value for jprm's `-v` flag
  pub verbosity: String,

  pub output_dir: PathBuf,
}

impl Default for JprmConfig {
  fn default() -> Self {
    Self {
      program: "jprm".to_string(),
      verbosity: "debug".to_string(),
      output_dir: PathBuf::from("artifacts"),
    }
  }
}

/// Plugin repository the archive is registered in
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
  /// Public repository hosting the release downloads
  pub url: String,

  pub manifest: PathBuf,
}

impl Default for RepositoryConfig {
  fn default() -> Self {
    Self {
      url: "https://github.com/Mik1ll/Shizou".to_string(),
      manifest: PathBuf::from("Repository/manifest.json"),
    }
  }
}

impl ReleaseConfig {
  /// Find config file in search order: jprm-release.toml, .jprm-release.toml, .config/jprm-release.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = [
      path.join("jprm-release.toml"),
      path.join(".jprm-release.toml"),
      path.join(".config").join("jprm-release.toml"),
    ];

    candidates.into_iter().find(|p| p.is_file())
  }

  /// Load config for a working directory
  ///
  /// An explicit path must exist. Without one, the search locations are tried and
  /// the built-in defaults are used when none is present.
  pub fn load(work_dir: &Path, explicit: Option<&Path>) -> ReleaseResult<Self> {
    let config_path = match explicit {
      Some(path) => {
        let path = work_dir.join(path);
        if !path.is_file() {
          return Err(ReleaseError::Config(ConfigError::NotFound { path }));
        }
        path
      }
      None => match Self::find_config_path(work_dir) {
        Some(path) => path,
        None => {
          tracing::debug!("no config file in {}, using defaults", work_dir.display());
          return Ok(Self::default());
        }
      },
    };

    tracing::debug!("loading config from {}", config_path.display());
    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config = Self::parse(&content).with_context(|| format!("Invalid config in {}", config_path.display()))?;

    Ok(config)
  }

  /// Parse and validate config text
  pub fn parse(content: &str) -> ReleaseResult<Self> {
    let config: ReleaseConfig = toml_edit::de::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  /// Validate field values
  pub fn validate(&self) -> ReleaseResult<()> {
    let required = [
      ("git.program", self.git.program.as_str()),
      ("git.tag_pattern", self.git.tag_pattern.as_str()),
      ("git.version_prefix", self.git.version_prefix.as_str()),
      ("project.abi_package", self.project.abi_package.as_str()),
      ("jprm.program", self.jprm.program.as_str()),
      ("jprm.verbosity", self.jprm.verbosity.as_str()),
      ("repository.url", self.repository.url.as_str()),
    ];
    for (field, value) in required {
      if value.trim().is_empty() {
        return Err(ReleaseError::Config(ConfigError::EmptyField {
          field: field.to_string(),
        }));
      }
    }

    let paths = [
      ("project.descriptor", &self.project.descriptor),
      ("metadata.file", &self.metadata.file),
      ("jprm.output_dir", &self.jprm.output_dir),
      ("repository.manifest", &self.repository.manifest),
    ];
    for (field, value) in paths {
      if value.as_os_str().is_empty() {
        return Err(ReleaseError::Config(ConfigError::EmptyField {
          field: field.to_string(),
        }));
      }
    }

    if !(self.repository.url.starts_with("https://") || self.repository.url.starts_with("http://")) {
      return Err(ReleaseError::Config(ConfigError::InvalidField {
        field: "repository.url".to_string(),
        reason: format!("'{}' is not an http(s) URL", self.repository.url),
      }));
    }

    Ok(())
  }
}

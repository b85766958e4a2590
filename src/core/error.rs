//! Error types for jprm-release with contextual messages
//!
//! Every failure in the release pipeline is fatal. Errors are grouped by what went
//! wrong (an external tool, missing data, a filesystem precondition, the config)
//! so that `print_error` can attach a helpful suggestion before the process exits.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Main error type for jprm-release
#[derive(Debug)]
pub enum ReleaseError {
  /// Configuration errors
  Config(ConfigError),

  /// External tool errors (git, jprm)
  Tool(ToolError),

  /// Expected data missing or malformed
  Data(DataError),

  /// Filesystem precondition violations
  Filesystem(FsError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ReleaseError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Add context to an existing error
  ///
  /// Anything but a message is wrapped into one, with the original error as its
  /// detail line and its help text kept.
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ReleaseError::Message { message, context, help } => ReleaseError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      ReleaseError::Io(e) => ReleaseError::Message {
        message: ctx_str,
        context: Some(e.to_string()),
        help: None,
      },
      other => ReleaseError::Message {
        context: Some(other.to_string()),
        help: other.help_message(),
        message: ctx_str,
      },
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ReleaseError::Config(e) => e.help_message(),
      ReleaseError::Tool(e) => e.help_message(),
      ReleaseError::Data(e) => e.help_message(),
      ReleaseError::Filesystem(e) => e.help_message(),
      ReleaseError::Message { help, .. } => help.clone(),
      ReleaseError::Io(_) => None,
    }
  }
}

impl fmt::Display for ReleaseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseError::Config(e) => write!(f, "{}", e),
      ReleaseError::Tool(e) => write!(f, "{}", e),
      ReleaseError::Data(e) => write!(f, "{}", e),
      ReleaseError::Filesystem(e) => write!(f, "{}", e),
      ReleaseError::Io(e) => write!(f, "I/O error: {}", e),
      ReleaseError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ReleaseError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ReleaseError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ReleaseError {
  fn from(err: io::Error) -> Self {
    ReleaseError::Io(err)
  }
}

impl From<toml_edit::de::Error> for ReleaseError {
  fn from(err: toml_edit::de::Error) -> Self {
    ReleaseError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_yaml::Error> for ReleaseError {
  fn from(err: serde_yaml::Error) -> Self {
    ReleaseError::message(format!("YAML error: {}", err))
  }
}

impl From<serde_json::Error> for ReleaseError {
  fn from(err: serde_json::Error) -> Self {
    ReleaseError::message(format!("JSON error: {}", err))
  }
}

impl From<regex::Error> for ReleaseError {
  fn from(err: regex::Error) -> Self {
    ReleaseError::message(format!("Invalid pattern: {}", err))
  }
}

impl From<ConfigError> for ReleaseError {
  fn from(err: ConfigError) -> Self {
    ReleaseError::Config(err)
  }
}

impl From<ToolError> for ReleaseError {
  fn from(err: ToolError) -> Self {
    ReleaseError::Tool(err)
  }
}

impl From<DataError> for ReleaseError {
  fn from(err: DataError) -> Self {
    ReleaseError::Data(err)
  }
}

impl From<FsError> for ReleaseError {
  fn from(err: FsError) -> Self {
    ReleaseError::Filesystem(err)
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Explicit --config path does not exist
  NotFound { path: PathBuf },

  /// Field present but empty
  EmptyField { field: String },

  /// Field value rejected by validation
  InvalidField { field: String, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => {
        Some("Omit --config to use jprm-release.toml from the working directory, or the built-in defaults.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { path } => {
        write!(f, "Config file not found: {}", path.display())
      }
      ConfigError::EmptyField { field } => {
        write!(f, "Config field '{}' must not be empty", field)
      }
      ConfigError::InvalidField { field, reason } => {
        write!(f, "Invalid config field '{}': {}", field, reason)
      }
    }
  }
}

/// External tool errors
#[derive(Debug)]
pub enum ToolError {
  /// The program could not be started at all
  Spawn { program: String, reason: String },

  /// git describe exited non-zero
  Describe { code: i32, stderr: String },

  /// jprm plugin build exited non-zero
  Build { code: i32 },

  /// jprm repo add exited non-zero
  RepoAdd { code: i32 },
}

impl ToolError {
  fn help_message(&self) -> Option<String> {
    match self {
      ToolError::Spawn { program, .. } => Some(format!("Make sure `{}` is installed and on PATH.", program)),
      ToolError::Describe { stderr, .. } => {
        if stderr.contains("No names found") || stderr.contains("No tags can describe") {
          Some("Create a release tag first, e.g. `git tag JellyfinPlugin/v1.0.0`.".to_string())
        } else if stderr.contains("not a git repository") {
          Some("Run jprm-release from inside the plugin's git checkout.".to_string())
        } else {
          None
        }
      }
      ToolError::Build { .. } => Some("Check the jprm output above for the failing dotnet step.".to_string()),
      ToolError::RepoAdd { .. } => None,
    }
  }
}

impl fmt::Display for ToolError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ToolError::Spawn { program, reason } => {
        write!(f, "Failed to execute {}: {}", program, reason)
      }
      ToolError::Describe { code, stderr } => {
        write!(f, "Git describe returned error code: {} {}", code, stderr.trim())
      }
      ToolError::Build { code } => {
        write!(f, "Jprm build returned error code: {}", code)
      }
      ToolError::RepoAdd { code } => {
        write!(f, "Jprm repo add returned error code: {}", code)
      }
    }
  }
}

/// Missing or malformed data
#[derive(Debug)]
pub enum DataError {
  /// Tag does not carry a version after the prefix marker
  MalformedTag { tag: String, prefix: String },

  /// No target framework element in the project descriptor
  MissingFramework,

  /// No ABI package reference in the project descriptor
  MissingTargetAbi { package: String },

  /// Metadata document is empty or null
  EmptyMetadata { path: PathBuf },

  /// Metadata document is not a mapping
  MetadataNotMapping { path: PathBuf },

  /// Packaging tool printed no archive path
  MissingArchivePath,
}

impl DataError {
  fn help_message(&self) -> Option<String> {
    match self {
      DataError::MalformedTag { prefix, .. } => Some(format!(
        "Release tags must look like `<name>{}<version>`, e.g. JellyfinPlugin/v1.2.3.",
        prefix
      )),
      DataError::MissingFramework => {
        Some("Declare <TargetFramework> or <TargetFrameworks> in the project file.".to_string())
      }
      DataError::MissingTargetAbi { package } => Some(format!(
        "Add a self-closing reference: <PackageReference Include=\"{}\" Version=\"x.y.z\" />",
        package
      )),
      _ => None,
    }
  }
}

impl fmt::Display for DataError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DataError::MalformedTag { tag, prefix } => {
        write!(f, "Tag '{}' has no version after '{}'", tag, prefix)
      }
      DataError::MissingFramework => {
        write!(f, "Failed to get .net framework version from csproj")
      }
      DataError::MissingTargetAbi { package } => {
        write!(f, "Failed to get {} package reference version in csproj", package)
      }
      DataError::EmptyMetadata { path } => {
        write!(f, "Failed to load any metadata from \"{}\"", path.display())
      }
      DataError::MetadataNotMapping { path } => {
        write!(f, "Metadata in \"{}\" is not a key-value mapping", path.display())
      }
      DataError::MissingArchivePath => {
        write!(f, "Jprm build did not report a package path")
      }
    }
  }
}

/// Filesystem precondition violations
#[derive(Debug)]
pub enum FsError {
  /// Output path exists but is not a directory
  NotADirectory { path: PathBuf },
}

impl FsError {
  fn help_message(&self) -> Option<String> {
    match self {
      FsError::NotADirectory { .. } => Some("Remove the file or set [jprm] output_dir to another path.".to_string()),
    }
  }
}

impl fmt::Display for FsError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FsError::NotADirectory { path } => write!(f, "\"{}\" is not a directory", path.display()),
    }
  }
}

/// Result type alias for jprm-release
pub type ReleaseResult<T> = Result<T, ReleaseError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ReleaseError>,
{
  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ReleaseError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}

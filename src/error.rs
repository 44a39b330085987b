//! Error types for modforge
//!
//! All modules use `ForgeResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for modforge operations
pub type ForgeResult<T> = Result<T, ForgeError>;

/// All errors that can occur in modforge
#[derive(Error, Debug)]
pub enum ForgeError {
    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    // Cache errors
    #[error("Module not found in cache: {0}")]
    ModuleNotFound(String),

    #[error("Template not found in cache: {0}")]
    TemplateNotFound(String),

    #[error("Invalid module name '{name}': {reason}")]
    InvalidModuleName { name: String, reason: String },

    #[error("No source repositories configured")]
    NoSourceRepos,

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed to start: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command failed: {command}, exit code: {code}")]
    CommandExit { command: String, code: i32 },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("{0}")]
    User(String),
}

impl ForgeError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a command exit error
    pub fn command_exit(command: impl Into<String>, code: i32) -> Self {
        Self::CommandExit {
            command: command.into(),
            code,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::TemplateNotFound(_) | Self::ModuleNotFound(_) => {
                Some("Run: modforge update  (then: modforge modules list)")
            }
            Self::NoSourceRepos => Some("Run: modforge repos add <git-url>"),
            Self::InvalidModuleName { .. } => {
                Some("Prefix must be alphanumeric; suffix may also contain '_'")
            }
            Self::CommandExit { .. } => {
                Some("Files written before the failure were left in place; remove them and retry")
            }
            _ => None,
        }
    }
}

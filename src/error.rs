//! Error types for tagmend

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tagmend
#[derive(Debug, Error)]
pub enum TagError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid {field} regex: {source}")]
    InvalidPattern {
        field: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid path {}: {reason}", path.display())]
    InvalidPath { path: PathBuf, reason: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("no operations remain after conflict resolution")]
    NoOperations,

    #[error("malformed frontmatter: {0}")]
    MalformedFrontmatter(#[source] serde_yaml::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TagError {
    /// Convenience constructor for path errors
    pub fn invalid_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        TagError::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            TagError::Config(_)
            | TagError::InvalidPattern { .. }
            | TagError::TomlDeserialize(_)
            | TagError::InvalidArgument(_) => 2,
            TagError::InvalidPath { .. } => 3,
            TagError::NoOperations => 4,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            TagError::InvalidPath { path, reason } => {
                format!(
                    "Invalid path {}: {}\n\n\
                    Suggestions:\n\
                    • Pass --root as an existing directory\n\
                    • File paths for 'update' must be relative to --root\n\
                    • Paths may not contain '..' segments",
                    path.display(),
                    reason
                )
            }
            TagError::NoOperations => {
                "No operations remain after conflict resolution\n\n\
                Every tag passed to --add was also passed to --remove (case-insensitive).\n\
                Suggestions:\n\
                • Drop the tag from one of the two lists\n\
                • Use 'tagmend replace' to rename a tag instead"
                    .to_string()
            }
            TagError::InvalidPattern { field, source } => {
                format!(
                    "Invalid {} regex: {}\n\n\
                    Check the pattern in your config file or unset TAGMEND_CONFIG \
                    to fall back to the defaults.",
                    field, source
                )
            }
            TagError::Config(msg) => {
                if msg.contains("max_digit_ratio") {
                    format!("{}\n\nExample: max_digit_ratio = 0.5", msg)
                } else if msg.contains("min_tag_length") {
                    format!("{}\n\nExample: min_tag_length = 3", msg)
                } else {
                    msg.clone()
                }
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using TagError
pub type Result<T> = std::result::Result<T, TagError>;

//! Error types for the configuration rewriter

use thiserror::Error;

/// Main error type for the configuration rewriter
#[derive(Error, Debug)]
pub enum RewriterError {
    /// Configuration file related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Runtime settings errors
    #[error("Settings error: {0}")]
    Settings(String),
}

/// Result type alias for rewriter operations
pub type Result<T> = std::result::Result<T, RewriterError>;

/// Configuration file specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// File not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// File exists but could not be read
    #[error("Failed to read configuration file {path}: {message}")]
    Read { path: String, message: String },

    /// Non-comment, non-blank line without a `=` delimiter
    #[error("Malformed line {line_number} in {path}: expected `key = value`, found `{line}`")]
    MalformedLine {
        path: String,
        line_number: usize,
        line: String,
    },

    /// Target could not be replaced
    #[error("Failed to write configuration file {path}: {message}")]
    Write { path: String, message: String },

    /// Environment variable holds a value that is not valid Unicode
    #[error("Environment variable {name} is not valid Unicode")]
    NonUnicodeEnv { name: String },

    /// Runtime settings could not be extracted
    #[error("Invalid rewriter settings: {0}")]
    InvalidSettings(String),
}

impl From<ConfigError> for RewriterError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::InvalidSettings(message) => RewriterError::Settings(message),
            other => RewriterError::Config(other.to_string()),
        }
    }
}

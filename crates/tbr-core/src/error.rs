//! Error types for tbr-core
//!
//! Centralized error handling using `thiserror` for ergonomic error definitions.

use thiserror::Error;

/// Main error type for tbr-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Regex pattern failed to compile
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The rejected pattern
        pattern: String,
        /// Why the pattern was rejected, e.g. the regex compiler message
        message: String,
    },

    /// Export/import format outside the supported set
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// No rule line matches the requested pattern
    #[error("Rule not found: {pattern}")]
    NotFound {
        /// The pattern that was searched for
        pattern: String,
    },

    /// Import content could not be parsed
    #[error("Failed to parse {format} content: {message}")]
    ParseFailure {
        /// Format being imported
        format: &'static str,
        /// Parser message
        message: String,
    },

    /// Rule file lacks the section a rule should go into
    #[error("Section {section} not found in rule file")]
    MissingSection {
        /// Section header that was searched for
        section: &'static str,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// Path to the missing config file
        path: String,
    },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    ConfigValue {
        /// Configuration key
        key: String,
        /// Error message
        message: String,
    },

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid pattern error
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Create a parse failure for the given import format
    pub fn parse_failure(format: &'static str, message: impl Into<String>) -> Self {
        Self::ParseFailure {
            format,
            message: message.into(),
        }
    }

    /// Create a config value error
    pub fn config_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

//! Error types for the fitplan_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for fitplan_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A repository operation was rejected; state is unchanged
    #[error("{0}")]
    Validation(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Shorthand for building a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// True if this error came from a rejected repository operation
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

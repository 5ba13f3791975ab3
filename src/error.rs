//! Error types for Crosscast

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CrosscastError>;

#[derive(Error, Debug)]
pub enum CrosscastError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Credential store error: {0}")]
    Store(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Errors surfaced by a platform adapter.
///
/// `Publishing` carries the remote platform's own message verbatim so the
/// caller can decide on remediation; the dispatcher folds these into
/// per-platform outcomes instead of propagating them.
#[derive(Error, Debug, Clone)]
pub enum PlatformError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Content validation failed: {0}")]
    Validation(String),

    #[error("Publishing failed: {0}")]
    Publishing(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl PlatformError {
    /// The message a `PublishRejected` outcome should carry for this error.
    ///
    /// Strips our own variant prefix so the adapter-supplied text survives
    /// verbatim in the aggregated result.
    pub fn detail(&self) -> &str {
        match self {
            PlatformError::Authentication(msg)
            | PlatformError::Validation(msg)
            | PlatformError::Publishing(msg)
            | PlatformError::Network(msg) => msg,
        }
    }
}

//! Error types for instacrew.

use thiserror::Error;

/// Primary error type for crew, configuration and tool operations.
#[derive(Error, Debug)]
pub enum CrewError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication error: {0}")]
    Authentication(#[from] crate::auth::AuthError),

    #[error("Content error: {0}")]
    Content(#[from] crate::content::ContentError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Crew definition error: {0}")]
    Definition(String),

    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl From<toml::de::Error> for CrewError {
    fn from(error: toml::de::Error) -> Self {
        Self::Definition(error.to_string())
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, CrewError>;

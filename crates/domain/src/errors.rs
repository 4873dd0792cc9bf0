//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Confidence score outside of `[0, 1]`
    #[error("Invalid confidence: {0} is out of range (must be 0.0-1.0)")]
    InvalidConfidence(f32),

    /// Event identifier could not be parsed
    #[error("Invalid event id: {0}")]
    InvalidEventId(String),

    /// Session identifier rejected by validation
    #[error("Invalid session id: {0}")]
    InvalidSessionId(String),

    /// Language code rejected by validation
    #[error("Invalid language code: {0}")]
    InvalidLanguageCode(String),

    /// Stored timestamp text could not be parsed
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// A parameter the caller asked for was not extracted by the NLU service
    #[error("Missing parameter: {0}")]
    MissingParameter(String),
}

impl DomainError {
    /// Create a missing parameter error
    pub fn missing_parameter(name: impl Into<String>) -> Self {
        Self::MissingParameter(name.into())
    }
}

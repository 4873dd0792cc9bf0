//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The event store could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// Speech-to-text service failed
    #[error("Transcription error: {0}")]
    Transcription(String),

    /// Intent detection service failed
    #[error("Intent service error: {0}")]
    IntentService(String),

    /// Text-to-speech service failed
    #[error("Synthesis error: {0}")]
    Synthesis(String),

    /// Writing or launching audio playback failed
    #[error("Playback error: {0}")]
    Playback(String),

    /// The named external service rejected the request due to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }
}

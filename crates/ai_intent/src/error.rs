//! Intent detection errors

use thiserror::Error;

/// Errors that can occur during intent detection
#[derive(Debug, Error)]
pub enum IntentError {
    /// Failed to connect to the NLU service
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the NLU service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Nothing to classify
    #[error("Query text is empty")]
    EmptyQuery,

    /// Response parsing failed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Timeout during detection
    #[error("Intent detection timeout after {0}ms")]
    Timeout(u64),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Credentials were rejected
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// The agent or session does not exist
    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    /// Server error
    #[error("Server error: {0}")]
    ServerError(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl IntentError {
    /// Whether repeating the same request may succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::Timeout(_) | Self::RateLimited | Self::ServerError(_)
        )
    }
}

impl From<reqwest::Error> for IntentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(30000)
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}

//! Intent port - Interface for the natural-language-understanding service

use async_trait::async_trait;
use domain::{LanguageCode, QueryResult, SessionId};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for intent detection
#[cfg_attr(test, automock)]
#[async_trait]
pub trait IntentPort: Send + Sync {
    /// Classify `text` and extract its parameters
    ///
    /// Reusing `session` between calls lets the service keep context.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::IntentService` if the service call fails.
    async fn detect_intent(
        &self,
        session: &SessionId,
        text: &str,
        language: &LanguageCode,
    ) -> Result<QueryResult, ApplicationError>;
}

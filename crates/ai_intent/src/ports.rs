//! Port definitions for intent detection

use async_trait::async_trait;
use domain::{LanguageCode, QueryResult, SessionId};

use crate::error::IntentError;

/// Port for natural language understanding services
#[async_trait]
pub trait IntentDetector: Send + Sync {
    /// Classify `text` within a dialog session
    ///
    /// # Errors
    ///
    /// Returns `IntentError` if the service cannot be reached or rejects the
    /// request.
    async fn detect_intent(
        &self,
        session_id: &SessionId,
        text: &str,
        language: &LanguageCode,
    ) -> Result<QueryResult, IntentError>;
}

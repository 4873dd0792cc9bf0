//! Intent adapter - Implements IntentPort using the Dialogflow client

use std::sync::Arc;

use ai_intent::{DialogflowClient, IntentConfig, IntentDetector, IntentError};
use application::error::ApplicationError;
use application::ports::IntentPort;
use async_trait::async_trait;
use domain::{LanguageCode, QueryResult, SessionId};
use tracing::{debug, instrument};

use crate::retry::{RetryConfig, RetryResult, with_retry};

/// Adapter for intent detection
pub struct IntentAdapter {
    detector: Arc<dyn IntentDetector>,
    retry: RetryConfig,
}

impl std::fmt::Debug for IntentAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentAdapter")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl IntentAdapter {
    /// Create an adapter backed by Dialogflow
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if the intent configuration is invalid.
    pub fn new(config: IntentConfig, retry: RetryConfig) -> Result<Self, ApplicationError> {
        let client = DialogflowClient::new(config).map_err(Self::map_error)?;
        Ok(Self::from_detector(Arc::new(client), retry))
    }

    /// Create an adapter around any detector
    #[must_use]
    pub fn from_detector(detector: Arc<dyn IntentDetector>, retry: RetryConfig) -> Self {
        Self { detector, retry }
    }

    fn map_error(err: IntentError) -> ApplicationError {
        match err {
            IntentError::Configuration(e) => ApplicationError::Configuration(e),
            IntentError::RateLimited => {
                ApplicationError::RateLimited("intent detection".to_string())
            },
            other => ApplicationError::IntentService(other.to_string()),
        }
    }
}

#[async_trait]
impl IntentPort for IntentAdapter {
    #[instrument(skip(self, session, text, language), fields(session = %session, language = %language, text_len = text.len()))]
    async fn detect_intent(
        &self,
        session: &SessionId,
        text: &str,
        language: &LanguageCode,
    ) -> Result<QueryResult, ApplicationError> {
        let RetryResult {
            result,
            attempts,
            total_duration,
        } = with_retry(&self.retry, || {
            self.detector.detect_intent(session, text, language)
        })
        .await;
        let query = result.map_err(Self::map_error)?;

        debug!(
            intent = %query.intent,
            confidence = %query.confidence,
            attempts,
            elapsed_ms = u64::try_from(total_duration.as_millis()).unwrap_or(u64::MAX),
            "Intent detected"
        );
        Ok(query)
    }
}

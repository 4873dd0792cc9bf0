//! Dialogflow ES v2 client
//!
//! Calls `POST {base}/{session}:detectIntent` with a text query input.

use std::time::Duration;

use async_trait::async_trait;
use domain::{Confidence, Intent, LanguageCode, QueryResult, SessionId};
use reqwest::{Client, RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use crate::config::IntentConfig;
use crate::error::IntentError;
use crate::ports::IntentDetector;
use crate::session::SessionPath;

/// Dialogflow intent detection client
#[derive(Debug, Clone)]
pub struct DialogflowClient {
    client: Client,
    config: IntentConfig,
}

impl DialogflowClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns `IntentError::Configuration` if the configuration is invalid.
    pub fn new(config: IntentConfig) -> Result<Self, IntentError> {
        config.validate().map_err(IntentError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| IntentError::Configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Resource name of a session in the configured agent
    #[must_use]
    pub fn session_path(&self, session_id: &SessionId) -> SessionPath {
        SessionPath::new(
            &self.config.project_id,
            self.config.environment.as_deref(),
            session_id,
        )
    }

    fn detect_url(&self, session: &SessionPath) -> String {
        format!("{}/{session}:detectIntent", self.config.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        if let Some(key) = &self.config.api_key {
            request.query(&[("key", key.expose_secret())])
        } else if let Some(token) = &self.config.access_token {
            request.bearer_auth(token.expose_secret())
        } else {
            request
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> IntentError {
        if err.is_timeout() {
            IntentError::Timeout(self.config.timeout_ms)
        } else {
            IntentError::from(err)
        }
    }
}

/// `detectIntent` request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DetectIntentRequest<'a> {
    query_input: QueryInput<'a>,
}

#[derive(Debug, Serialize)]
struct QueryInput<'a> {
    text: TextInput<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TextInput<'a> {
    text: &'a str,
    language_code: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetectIntentResponse {
    #[serde(default)]
    response_id: Option<String>,
    query_result: Option<ApiQueryResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiQueryResult {
    #[serde(default)]
    query_text: String,
    #[serde(default)]
    intent: Option<ApiIntent>,
    #[serde(default)]
    intent_detection_confidence: f32,
    #[serde(default)]
    fulfillment_text: String,
    #[serde(default)]
    parameters: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiIntent {
    #[serde(default)]
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

impl ApiQueryResult {
    fn into_domain(self, fallback_text: &str) -> QueryResult {
        let label = self.intent.map(|i| i.display_name).unwrap_or_default();
        let query_text = if self.query_text.is_empty() {
            fallback_text.to_string()
        } else {
            self.query_text
        };

        QueryResult::new(
            query_text,
            Intent::from_label(&label),
            Confidence::clamped(self.intent_detection_confidence),
            self.fulfillment_text,
        )
        .with_parameters(self.parameters)
    }
}

fn error_from_status(status: StatusCode, body: &str, session: &SessionPath) -> IntentError {
    let message = serde_json::from_str::<ApiError>(body)
        .map_or_else(|_| format!("HTTP {status}: {body}"), |e| e.error.message);

    match status {
        StatusCode::TOO_MANY_REQUESTS => IntentError::RateLimited,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => IntentError::Unauthorized(message),
        StatusCode::NOT_FOUND => IntentError::AgentNotFound(session.to_string()),
        s if s.is_server_error() => IntentError::ServerError(message),
        _ => IntentError::RequestFailed(message),
    }
}

#[async_trait]
impl IntentDetector for DialogflowClient {
    #[instrument(skip(self, text), fields(session_id = %session_id, language = %language, text_len = text.len()))]
    async fn detect_intent(
        &self,
        session_id: &SessionId,
        text: &str,
        language: &LanguageCode,
    ) -> Result<QueryResult, IntentError> {
        if text.trim().is_empty() {
            return Err(IntentError::EmptyQuery);
        }

        let session = self.session_path(session_id);
        info!(session = %session, "Detecting intent");

        let request = DetectIntentRequest {
            query_input: QueryInput {
                text: TextInput {
                    text,
                    language_code: language.as_str(),
                },
            },
        };

        let response = self
            .authorize(self.client.post(self.detect_url(&session)))
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "Dialogflow request failed");
            return Err(error_from_status(status, &body, &session));
        }

        let body: DetectIntentResponse = response
            .json()
            .await
            .map_err(|e| IntentError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        let result = body
            .query_result
            .ok_or_else(|| IntentError::InvalidResponse("Missing queryResult".to_string()))?
            .into_domain(text);

        debug!(
            response_id = ?body.response_id,
            intent = %result.intent,
            confidence = %result.confidence,
            parameters = result.parameters.len(),
            "Intent detected"
        );

        Ok(result)
    }
}

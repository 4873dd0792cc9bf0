//! Configuration for the Dialogflow client

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Configuration for the intent detection service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentConfig {
    /// Google Cloud project that owns the agent
    #[serde(default)]
    pub project_id: String,

    /// Agent environment; the draft agent is used when unset
    #[serde(default)]
    pub environment: Option<String>,

    /// API key sent as the `key` query parameter
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// OAuth access token sent as a bearer token
    #[serde(default, skip_serializing)]
    pub access_token: Option<SecretString>,

    /// Dialogflow API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "https://dialogflow.googleapis.com/v2".to_string()
}

const fn default_timeout_ms() -> u64 {
    10000 // 10 seconds
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            environment: None,
            api_key: None,
            access_token: None,
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl IntentConfig {
    /// Create config for a project using an API key
    pub fn with_api_key(project_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            api_key: Some(SecretString::from(api_key.into())),
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.project_id.trim().is_empty() {
            return Err("Dialogflow project id is required".to_string());
        }

        if self.project_id.contains('/') {
            return Err(format!(
                "Project id must not contain '/', got {}",
                self.project_id
            ));
        }

        if self.api_key.is_none() && self.access_token.is_none() {
            return Err("Either an API key or an access token is required".to_string());
        }

        if self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

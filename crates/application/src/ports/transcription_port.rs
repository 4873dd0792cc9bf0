//! Transcription port - Interface for speech-to-text

use async_trait::async_trait;
use domain::LanguageCode;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Result of a transcription operation
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionResult {
    /// Best transcript of the whole recording
    pub text: String,
    /// Confidence score (0.0 - 1.0), when the service reports one
    pub confidence: Option<f32>,
}

impl TranscriptionResult {
    /// Create a result with no confidence
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: None,
        }
    }
}

/// Port for speech-to-text
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TranscriptionPort: Send + Sync {
    /// Transcribe the recording at `audio_path`
    ///
    /// `audio_path` is either a local file path or a `gs://` cloud-storage URI.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Transcription` if the audio cannot be read or
    /// the service call fails.
    async fn transcribe(
        &self,
        audio_path: &str,
        language: &LanguageCode,
    ) -> Result<TranscriptionResult, ApplicationError>;
}

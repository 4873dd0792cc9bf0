//! Synthesis port - Interface for text-to-speech

use async_trait::async_trait;
use domain::LanguageCode;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Text to be spoken
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    /// Plain response text (never pre-escaped)
    pub text: String,
    /// Whether the adapter should wrap the text in `<speak>` markup
    pub as_ssml: bool,
}

impl Utterance {
    /// Plain-text utterance
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            as_ssml: false,
        }
    }

    /// Utterance rendered as SSML
    #[must_use]
    pub fn ssml(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            as_ssml: true,
        }
    }
}

/// Encoding of synthesized audio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEncoding {
    /// MPEG layer 3
    Mp3,
    /// Uncompressed 16-bit PCM with WAV header
    Linear16,
    /// Ogg container with Opus codec
    OggOpus,
}

impl AudioEncoding {
    /// Conventional file extension
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Linear16 => "wav",
            Self::OggOpus => "ogg",
        }
    }
}

/// Result of a speech synthesis operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisResult {
    /// Generated audio data
    pub audio_data: Vec<u8>,
    /// Encoding of the audio
    pub encoding: AudioEncoding,
}

/// Port for text-to-speech
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SynthesisPort: Send + Sync {
    /// Render an utterance to audio
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Synthesis` if the service call fails.
    async fn synthesize(
        &self,
        utterance: &Utterance,
        language: &LanguageCode,
    ) -> Result<SynthesisResult, ApplicationError>;
}

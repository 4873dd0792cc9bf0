//! Port definitions for speech processing
//!
//! Defines the traits (ports) that speech processing adapters must implement.

use async_trait::async_trait;

use crate::error::SpeechError;
use crate::types::{AudioData, AudioSource, SynthesisInput, Transcription};

/// Port for Speech-to-Text (STT) implementations
///
/// # Example
///
/// ```ignore
/// use ai_speech::{AudioSource, SpeechToText};
///
/// async fn hear(stt: &impl SpeechToText) -> Result<String, SpeechError> {
///     let source = AudioSource::parse("gs://bucket/speech.flac");
///     Ok(stt.transcribe(&source, "en-US").await?.text)
/// }
/// ```
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe audio to text
    ///
    /// # Arguments
    ///
    /// * `source` - Local file or cloud object holding the audio
    /// * `language_code` - BCP-47 language code (e.g., "en-US")
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::NoSpeechDetected` when the service heard nothing,
    /// or another `SpeechError` if the request fails.
    async fn transcribe(
        &self,
        source: &AudioSource,
        language_code: &str,
    ) -> Result<Transcription, SpeechError>;
}

/// Port for Text-to-Speech (TTS) implementations
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Convert text or SSML to speech
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if synthesis fails.
    async fn synthesize(
        &self,
        input: &SynthesisInput,
        language_code: &str,
    ) -> Result<AudioData, SpeechError>;
}

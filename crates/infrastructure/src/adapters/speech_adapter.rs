//! Speech adapter - Implements the transcription and synthesis ports using ai_speech

use std::sync::Arc;

use ai_speech::{
    AudioEncoding as AiAudioEncoding, AudioSource, GoogleSpeechProvider, SpeechConfig,
    SpeechError, SpeechToText, SynthesisInput, TextToSpeech,
};
use application::error::ApplicationError;
use application::ports::{
    AudioEncoding, SynthesisPort, SynthesisResult, TranscriptionPort, TranscriptionResult,
    Utterance,
};
use async_trait::async_trait;
use domain::LanguageCode;
use tracing::{debug, instrument};

use crate::retry::{RetryConfig, RetryResult, with_retry};

const STT_SERVICE: &str = "speech-to-text";
const TTS_SERVICE: &str = "text-to-speech";

/// Adapter for Google speech services
///
/// Transient failures (rate limiting, timeouts, dropped connections) are
/// retried according to the configured policy before being mapped.
pub struct SpeechAdapter {
    stt: Arc<dyn SpeechToText>,
    tts: Arc<dyn TextToSpeech>,
    retry: RetryConfig,
}

impl std::fmt::Debug for SpeechAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechAdapter")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl SpeechAdapter {
    /// Create an adapter backed by Google Cloud Speech-to-Text and Text-to-Speech
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if the speech configuration is invalid.
    pub fn new(config: SpeechConfig, retry: RetryConfig) -> Result<Self, ApplicationError> {
        let provider = Arc::new(
            GoogleSpeechProvider::new(config)
                .map_err(|e| ApplicationError::Configuration(e.to_string()))?,
        );

        Ok(Self {
            stt: provider.clone(),
            tts: provider,
            retry,
        })
    }

    /// Create an adapter from explicit providers
    #[must_use]
    pub fn from_providers(
        stt: Arc<dyn SpeechToText>,
        tts: Arc<dyn TextToSpeech>,
        retry: RetryConfig,
    ) -> Self {
        Self { stt, tts, retry }
    }

    /// FLAC is accepted for recognition only
    const fn to_port_encoding(encoding: AiAudioEncoding) -> Option<AudioEncoding> {
        match encoding {
            AiAudioEncoding::Mp3 => Some(AudioEncoding::Mp3),
            AiAudioEncoding::Linear16 => Some(AudioEncoding::Linear16),
            AiAudioEncoding::OggOpus => Some(AudioEncoding::OggOpus),
            AiAudioEncoding::Flac => None,
        }
    }

    fn map_transcription_error(err: SpeechError) -> ApplicationError {
        match err {
            SpeechError::Configuration(e) => ApplicationError::Configuration(e),
            SpeechError::RateLimited => ApplicationError::RateLimited(STT_SERVICE.to_string()),
            other => ApplicationError::Transcription(other.to_string()),
        }
    }

    fn map_synthesis_error(err: SpeechError) -> ApplicationError {
        match err {
            SpeechError::Configuration(e) => ApplicationError::Configuration(e),
            SpeechError::RateLimited => ApplicationError::RateLimited(TTS_SERVICE.to_string()),
            other => ApplicationError::Synthesis(other.to_string()),
        }
    }
}

#[async_trait]
impl TranscriptionPort for SpeechAdapter {
    #[instrument(skip(self, language), fields(language = %language))]
    async fn transcribe(
        &self,
        audio_path: &str,
        language: &LanguageCode,
    ) -> Result<TranscriptionResult, ApplicationError> {
        let source = AudioSource::parse(audio_path);
        debug!(source = %source, encoding = %source.encoding(), "Transcribing audio");

        let RetryResult {
            result,
            attempts,
            total_duration,
        } = with_retry(&self.retry, || {
            self.stt.transcribe(&source, language.as_str())
        })
        .await;
        let transcription = result.map_err(Self::map_transcription_error)?;

        debug!(
            text_len = transcription.text.len(),
            confidence = ?transcription.confidence,
            attempts,
            elapsed_ms = u64::try_from(total_duration.as_millis()).unwrap_or(u64::MAX),
            "Transcription complete"
        );

        Ok(TranscriptionResult {
            text: transcription.text,
            confidence: transcription.confidence,
        })
    }
}

#[async_trait]
impl SynthesisPort for SpeechAdapter {
    #[instrument(skip(self, utterance, language), fields(language = %language, text_len = utterance.text.len(), ssml = utterance.as_ssml))]
    async fn synthesize(
        &self,
        utterance: &Utterance,
        language: &LanguageCode,
    ) -> Result<SynthesisResult, ApplicationError> {
        let input = SynthesisInput::from_text(&utterance.text, utterance.as_ssml);

        let RetryResult {
            result,
            attempts,
            total_duration,
        } = with_retry(&self.retry, || self.tts.synthesize(&input, language.as_str())).await;
        let audio = result.map_err(Self::map_synthesis_error)?;

        let encoding = Self::to_port_encoding(audio.encoding()).ok_or_else(|| {
            ApplicationError::Synthesis(format!(
                "Unsupported output encoding: {}",
                audio.encoding()
            ))
        })?;

        debug!(
            audio_size = audio.size_bytes(),
            attempts,
            elapsed_ms = u64::try_from(total_duration.as_millis()).unwrap_or(u64::MAX),
            "Synthesis complete"
        );

        Ok(SynthesisResult {
            audio_data: audio.into_data(),
            encoding,
        })
    }
}

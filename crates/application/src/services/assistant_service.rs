//! Assistant service - One spoken request, end to end
//!
//! The pipeline runs sequentially:
//! 1. Transcribe the audio (STT)
//! 2. Detect the intent of the transcript (NLU)
//! 3. Route the query result against the event memory
//! 4. Synthesize the response (TTS)
//! 5. Hand the audio to the player, if one is configured

use std::{fmt, sync::Arc, time::Instant};

use domain::{LanguageCode, QueryResult, SessionId};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{
        IntentPort, PlaybackPort, PlaybackReport, SynthesisPort, SynthesisResult,
        TranscriptionPort, Utterance,
    },
    services::{IntentRouter, RouteDecision},
};

/// Assistant pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantConfig {
    /// Send the response to TTS as SSML
    pub use_ssml: bool,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self { use_ssml: true }
    }
}

/// A single spoken request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantRequest {
    /// Dialog session the request belongs to
    pub session_id: SessionId,
    /// Language of the audio and the reply
    pub language: LanguageCode,
    /// Local path or `gs://` URI of the recorded audio
    pub audio_path: String,
}

impl AssistantRequest {
    /// Create a request
    pub fn new(session_id: SessionId, language: LanguageCode, audio_path: impl Into<String>) -> Self {
        Self {
            session_id,
            language,
            audio_path: audio_path.into(),
        }
    }
}

/// Everything produced while answering a request
#[derive(Debug, Clone)]
pub struct AssistantReply {
    /// What the speech service heard
    pub transcript: String,
    /// What the NLU service understood
    pub query: QueryResult,
    /// Response text and routing outcome
    pub decision: RouteDecision,
    /// Synthesized response audio
    pub audio: SynthesisResult,
    /// Playback result; `None` when playback is disabled or failed
    pub playback: Option<PlaybackReport>,
    /// Wall-clock time spent on the request
    pub processing_time_ms: u64,
}

impl AssistantReply {
    /// The text spoken back to the user
    #[must_use]
    pub fn response(&self) -> &str {
        &self.decision.response
    }
}

/// Runs the speech → intent → memory → speech pipeline
pub struct AssistantService {
    transcription: Arc<dyn TranscriptionPort>,
    intent: Arc<dyn IntentPort>,
    synthesis: Arc<dyn SynthesisPort>,
    playback: Option<Arc<dyn PlaybackPort>>,
    router: IntentRouter,
    config: AssistantConfig,
}

impl fmt::Debug for AssistantService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssistantService")
            .field("router", &self.router)
            .field("playback", &self.playback.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AssistantService {
    /// Create a pipeline without playback
    pub fn new(
        transcription: Arc<dyn TranscriptionPort>,
        intent: Arc<dyn IntentPort>,
        synthesis: Arc<dyn SynthesisPort>,
        router: IntentRouter,
    ) -> Self {
        Self {
            transcription,
            intent,
            synthesis,
            playback: None,
            router,
            config: AssistantConfig::default(),
        }
    }

    /// Play synthesized responses through this port
    #[must_use]
    pub fn with_playback(mut self, playback: Arc<dyn PlaybackPort>) -> Self {
        self.playback = Some(playback);
        self
    }

    /// Use custom configuration
    #[must_use]
    pub fn with_config(mut self, config: AssistantConfig) -> Self {
        self.config = config;
        self
    }

    /// Answer one spoken request
    ///
    /// # Errors
    ///
    /// Fails when transcription, intent detection, storage or synthesis
    /// fails. Playback failures are logged and reported as `playback: None`.
    #[instrument(skip(self, request), fields(
        session_id = %request.session_id,
        language = %request.language,
        audio = %request.audio_path
    ))]
    pub async fn handle(&self, request: &AssistantRequest) -> Result<AssistantReply, ApplicationError> {
        let start = Instant::now();

        info!("Transcribing audio");
        let transcription = self
            .transcription
            .transcribe(&request.audio_path, &request.language)
            .await
            .inspect_err(|e| warn!(error = %e, "Transcription failed"))?;
        debug!(
            transcript = %transcription.text,
            confidence = ?transcription.confidence,
            "Transcription complete"
        );

        let query = self
            .intent
            .detect_intent(&request.session_id, &transcription.text, &request.language)
            .await
            .inspect_err(|e| warn!(error = %e, "Intent detection failed"))?;
        info!(
            intent = %query.intent,
            confidence = %query.confidence,
            fulfillment = %query.fulfillment_text,
            "Intent detected"
        );

        let decision = self.router.route(&query).await?;
        debug!(response = %decision.response, "Response chosen");

        let utterance = if self.config.use_ssml {
            Utterance::ssml(&decision.response)
        } else {
            Utterance::plain(&decision.response)
        };
        let audio = self
            .synthesis
            .synthesize(&utterance, &request.language)
            .await
            .inspect_err(|e| warn!(error = %e, "Synthesis failed"))?;

        let playback = match &self.playback {
            Some(player) => match player.play(&audio).await {
                Ok(report) => Some(report),
                Err(e) => {
                    warn!(error = %e, "Playback failed");
                    None
                },
            },
            None => None,
        };

        #[allow(clippy::cast_possible_truncation)]
        let processing_time_ms = start.elapsed().as_millis() as u64;
        info!(processing_time_ms, "Request answered");

        Ok(AssistantReply {
            transcript: transcription.text,
            query,
            decision,
            audio,
            playback,
            processing_time_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use domain::{Confidence, Intent};
    use serde_json::json;

    use super::*;
    use crate::{
        ports::{
            AudioEncoding, MockIntentPort, MockPlaybackPort, MockSynthesisPort,
            MockTranscriptionPort, TranscriptionResult,
        },
        services::{test_support::VecEventStore, EventMemory, RouteOutcome},
    };

    fn request() -> AssistantRequest {
        AssistantRequest::new(
            SessionId::parse("abc123").unwrap(),
            LanguageCode::default(),
            "speech.wav",
        )
    }

    fn transcription_of(text: &'static str) -> MockTranscriptionPort {
        let mut mock = MockTranscriptionPort::new();
        mock.expect_transcribe()
            .returning(move |_, _| Ok(TranscriptionResult::new(text)));
        mock
    }

    fn intent_returning(intent: Intent, fulfillment: &'static str) -> MockIntentPort {
        let mut mock = MockIntentPort::new();
        mock.expect_detect_intent().returning(move |_, text, _| {
            Ok(QueryResult::new(text, intent.clone(), Confidence::clamped(0.9), fulfillment)
                .with_parameter("verb", json!(["watered"]))
                .with_parameter("object", json!(["plants"])))
        });
        mock
    }

    fn synthesis_echo() -> MockSynthesisPort {
        let mut mock = MockSynthesisPort::new();
        mock.expect_synthesize().returning(|utterance, _| {
            Ok(SynthesisResult {
                audio_data: utterance.text.as_bytes().to_vec(),
                encoding: AudioEncoding::Mp3,
            })
        });
        mock
    }

    fn router() -> IntentRouter {
        IntentRouter::new(EventMemory::new(Arc::new(VecEventStore::default())))
    }

    #[tokio::test]
    async fn detect_request_is_recorded_and_spoken() {
        let service = AssistantService::new(
            Arc::new(transcription_of("I watered the plants")),
            Arc::new(intent_returning(Intent::EventDetect, "Okay, noted")),
            Arc::new(synthesis_echo()),
            router(),
        );

        let reply = service.handle(&request()).await.unwrap();

        assert_eq!(reply.transcript, "I watered the plants");
        assert_eq!(reply.response(), "Okay, noted");
        assert!(matches!(reply.decision.outcome, RouteOutcome::Recorded { .. }));
        assert_eq!(reply.audio.audio_data, b"Okay, noted");
        assert!(reply.playback.is_none());
    }

    #[tokio::test]
    async fn question_without_history_answers_no() {
        let service = AssistantService::new(
            Arc::new(transcription_of("when did I water the plants")),
            Arc::new(intent_returning(Intent::EventQuestion, "Yes")),
            Arc::new(synthesis_echo()),
            router(),
        );

        let reply = service.handle(&request()).await.unwrap();
        assert_eq!(reply.response(), "no");
    }

    #[tokio::test]
    async fn session_and_language_are_forwarded() {
        let mut intent = MockIntentPort::new();
        intent
            .expect_detect_intent()
            .withf(|session, text, language| {
                session.as_str() == "abc123"
                    && text.contains("hello")
                    && language.as_str() == "en-US"
            })
            .times(1)
            .returning(|_, text, _| {
                Ok(QueryResult::new(text, Intent::from_label("smalltalk"), Confidence::clamped(1.0), "Hi"))
            });

        let service = AssistantService::new(
            Arc::new(transcription_of("hello")),
            Arc::new(intent),
            Arc::new(synthesis_echo()),
            router(),
        );

        let reply = service.handle(&request()).await.unwrap();
        assert_eq!(reply.response(), "no");
    }

    #[tokio::test]
    async fn ssml_flag_follows_config() {
        let mut synthesis = MockSynthesisPort::new();
        synthesis
            .expect_synthesize()
            .withf(|utterance, _| !utterance.as_ssml)
            .times(1)
            .returning(|_, _| {
                Ok(SynthesisResult {
                    audio_data: vec![1, 2, 3],
                    encoding: AudioEncoding::Mp3,
                })
            });

        let service = AssistantService::new(
            Arc::new(transcription_of("I watered the plants")),
            Arc::new(intent_returning(Intent::EventDetect, "Okay")),
            Arc::new(synthesis),
            router(),
        )
        .with_config(AssistantConfig { use_ssml: false });

        service.handle(&request()).await.unwrap();
    }

    #[tokio::test]
    async fn transcription_failure_stops_pipeline() {
        let mut transcription = MockTranscriptionPort::new();
        transcription
            .expect_transcribe()
            .returning(|_, _| Err(ApplicationError::Transcription("no speech".to_string())));
        let mut intent = MockIntentPort::new();
        intent.expect_detect_intent().never();

        let service = AssistantService::new(
            Arc::new(transcription),
            Arc::new(intent),
            Arc::new(synthesis_echo()),
            router(),
        );

        let result = service.handle(&request()).await;
        assert!(matches!(result, Err(ApplicationError::Transcription(_))));
    }

    #[tokio::test]
    async fn synthesis_failure_is_an_error() {
        let mut synthesis = MockSynthesisPort::new();
        synthesis
            .expect_synthesize()
            .returning(|_, _| Err(ApplicationError::Synthesis("quota".to_string())));

        let service = AssistantService::new(
            Arc::new(transcription_of("I watered the plants")),
            Arc::new(intent_returning(Intent::EventDetect, "Okay")),
            Arc::new(synthesis),
            router(),
        );

        let result = service.handle(&request()).await;
        assert!(matches!(result, Err(ApplicationError::Synthesis(_))));
    }

    #[tokio::test]
    async fn playback_receives_synthesized_audio() {
        let mut playback = MockPlaybackPort::new();
        playback
            .expect_play()
            .withf(|audio| audio.audio_data == b"Okay")
            .times(1)
            .returning(|_| {
                Ok(PlaybackReport {
                    output_path: PathBuf::from("output.mp3"),
                    player_started: true,
                })
            });

        let service = AssistantService::new(
            Arc::new(transcription_of("I watered the plants")),
            Arc::new(intent_returning(Intent::EventDetect, "Okay")),
            Arc::new(synthesis_echo()),
            router(),
        )
        .with_playback(Arc::new(playback));

        let reply = service.handle(&request()).await.unwrap();
        let report = reply.playback.unwrap();
        assert!(report.player_started);
        assert_eq!(report.output_path, PathBuf::from("output.mp3"));
    }

    #[tokio::test]
    async fn playback_failure_is_not_fatal() {
        let mut playback = MockPlaybackPort::new();
        playback
            .expect_play()
            .returning(|_| Err(ApplicationError::Playback("mpg123 not found".to_string())));

        let service = AssistantService::new(
            Arc::new(transcription_of("I watered the plants")),
            Arc::new(intent_returning(Intent::EventDetect, "Okay")),
            Arc::new(synthesis_echo()),
            router(),
        )
        .with_playback(Arc::new(playback));

        let reply = service.handle(&request()).await.unwrap();
        assert!(reply.playback.is_none());
        assert_eq!(reply.response(), "Okay");
    }
}

//! Playback adapter - Implements PlaybackPort with an external audio player

use ai_speech::{AudioData, AudioEncoding as AiAudioEncoding, AudioPlayer};
use application::error::ApplicationError;
use application::ports::{AudioEncoding, PlaybackPort, PlaybackReport, SynthesisResult};
use async_trait::async_trait;
use tracing::instrument;

/// Writes responses to `output.<ext>` and launches the configured player
#[derive(Debug, Clone)]
pub struct PlaybackAdapter {
    player: AudioPlayer,
}

impl PlaybackAdapter {
    /// Wrap a configured player
    #[must_use]
    pub const fn new(player: AudioPlayer) -> Self {
        Self { player }
    }

    const fn to_speech_encoding(encoding: AudioEncoding) -> AiAudioEncoding {
        match encoding {
            AudioEncoding::Mp3 => AiAudioEncoding::Mp3,
            AudioEncoding::Linear16 => AiAudioEncoding::Linear16,
            AudioEncoding::OggOpus => AiAudioEncoding::OggOpus,
        }
    }
}

#[async_trait]
impl PlaybackPort for PlaybackAdapter {
    #[instrument(skip(self, audio), fields(audio_size = audio.audio_data.len()))]
    async fn play(&self, audio: &SynthesisResult) -> Result<PlaybackReport, ApplicationError> {
        let data = AudioData::new(
            audio.audio_data.clone(),
            Self::to_speech_encoding(audio.encoding),
        );

        let outcome = self
            .player
            .play(&data)
            .await
            .map_err(|e| ApplicationError::Playback(e.to_string()))?;

        Ok(PlaybackReport {
            player_started: outcome.player_started(),
            output_path: outcome.output_path,
        })
    }
}

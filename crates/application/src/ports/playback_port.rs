//! Playback port - Interface for handing synthesized audio to a player

use std::path::PathBuf;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;
use crate::ports::SynthesisResult;

/// What the playback adapter did with the audio
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackReport {
    /// Where the audio was written
    pub output_path: PathBuf,
    /// Whether a player process was launched
    pub player_started: bool,
}

/// Port for audio playback
///
/// Playback is fire-and-forget: implementations launch the player and return
/// without waiting for it to finish.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PlaybackPort: Send + Sync {
    /// Write the audio out and start playing it
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Playback` if the audio cannot be written or
    /// the player cannot be launched.
    async fn play(&self, audio: &SynthesisResult) -> Result<PlaybackReport, ApplicationError>;
}

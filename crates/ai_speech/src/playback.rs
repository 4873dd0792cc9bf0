//! Playback of synthesized speech through an external player
//!
//! The audio is written to `<dir>/output.<ext>` (overwritten on every run)
//! and the configured player, `mpg123` by default, is started on that file.
//! The player is not awaited; it keeps running after the request finishes.

use std::{
    path::{Path, PathBuf},
    process::Stdio,
};

use tokio::process::Command;
use tracing::{debug, info, instrument};

use crate::error::SpeechError;
use crate::types::AudioData;

/// Default player command
pub const DEFAULT_PLAYER: &str = "mpg123";

/// Stem of the file the latest response is written to
const OUTPUT_STEM: &str = "output";

/// What happened when playing a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackOutcome {
    /// Where the audio was written
    pub output_path: PathBuf,
    /// Process id of the spawned player, if one was started
    pub player_pid: Option<u32>,
}

impl PlaybackOutcome {
    /// Whether a player process was started
    pub const fn player_started(&self) -> bool {
        self.player_pid.is_some()
    }
}

/// Writes audio to disk and hands it to an external player
#[derive(Debug, Clone)]
pub struct AudioPlayer {
    output_dir: PathBuf,
    command: Option<String>,
    args: Vec<String>,
}

impl AudioPlayer {
    /// Create a player that writes into `output_dir` and runs `mpg123`
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            command: Some(DEFAULT_PLAYER.to_string()),
            args: Vec::new(),
        }
    }

    /// Use a different player command and leading arguments
    #[must_use]
    pub fn with_command(mut self, command: impl Into<String>, args: Vec<String>) -> Self {
        self.command = Some(command.into());
        self.args = args;
        self
    }

    /// Only write the audio file; never start a player
    #[must_use]
    pub fn without_player(mut self) -> Self {
        self.command = None;
        self
    }

    /// Path the given audio will be written to
    #[must_use]
    pub fn output_path(&self, audio: &AudioData) -> PathBuf {
        self.output_dir
            .join(format!("{OUTPUT_STEM}.{}", audio.encoding().extension()))
    }

    /// Write the audio and start the player
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::PlaybackFailed` if the file cannot be written or
    /// the player cannot be started.
    #[instrument(skip(self, audio), fields(audio_size = audio.size_bytes(), encoding = %audio.encoding()))]
    pub async fn play(&self, audio: &AudioData) -> Result<PlaybackOutcome, SpeechError> {
        let output_path = self.output_path(audio);
        write_output(&output_path, audio.data()).await?;
        debug!(path = %output_path.display(), "Wrote synthesized audio");

        let player_pid = match &self.command {
            Some(command) => Some(self.spawn(command, &output_path)?),
            None => None,
        };

        Ok(PlaybackOutcome {
            output_path,
            player_pid,
        })
    }

    fn spawn(&self, command: &str, path: &Path) -> Result<u32, SpeechError> {
        let child = Command::new(command)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| SpeechError::PlaybackFailed(format!("Failed to start {command}: {e}")))?;

        let pid = child.id().unwrap_or_default();
        info!(player = command, pid, "Started audio player");
        Ok(pid)
    }
}

async fn write_output(path: &Path, data: &[u8]) -> Result<(), SpeechError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            SpeechError::PlaybackFailed(format!("Cannot create {}: {e}", parent.display()))
        })?;
    }
    tokio::fs::write(path, data)
        .await
        .map_err(|e| SpeechError::PlaybackFailed(format!("Cannot write {}: {e}", path.display())))
}

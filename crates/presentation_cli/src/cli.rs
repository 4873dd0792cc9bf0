//! Command-line arguments

use std::path::PathBuf;

use anyhow::Context;
use application::AssistantRequest;
use clap::Parser;
use domain::{LanguageCode, SessionId};
use infrastructure::AppConfig;

/// Speaker for Seniors
///
/// Transcribes a recording, works out whether the speaker is reporting
/// something they did or asking when they last did it, and answers out loud.
#[derive(Debug, Parser)]
#[command(name = "speaker")]
#[command(author, version, about = "Voice memory assistant for seniors", long_about = None)]
pub struct Cli {
    /// Identifier of the intent detection session (random when omitted)
    #[arg(long)]
    pub session_id: Option<String>,

    /// Language of the recording and the reply
    #[arg(long, default_value = LanguageCode::DEFAULT)]
    pub language_code: String,

    /// Recording to process: a local file or a gs:// URI
    #[arg(long)]
    pub audio_file_path: String,

    /// Configuration file (defaults to ./speaker.toml when present)
    #[arg(long, env = "SPEAKER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the event store, query log and output audio
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Write the reply audio but do not start a player
    #[arg(long)]
    pub no_playback: bool,

    /// Print the reply as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Determine log filter level from verbosity count
pub const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

impl Cli {
    /// Fold command-line flags into the loaded configuration
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.data_dir {
            config.storage.data_dir.clone_from(dir);
        }
        if self.no_playback {
            config.assistant.playback = false;
        }
        if self.verbose > 0 {
            config.logging.filter = Some(log_filter_from_verbosity(self.verbose).to_string());
        }
    }

    /// Build the pipeline request from the arguments
    ///
    /// # Errors
    ///
    /// Fails if the session id or language code is malformed.
    pub fn request(&self) -> anyhow::Result<AssistantRequest> {
        let session_id = match &self.session_id {
            Some(raw) => SessionId::parse(raw).context("invalid --session-id")?,
            None => SessionId::new(),
        };
        let language = LanguageCode::parse(&self.language_code).context("invalid --language-code")?;

        Ok(AssistantRequest::new(
            session_id,
            language,
            self.audio_file_path.clone(),
        ))
    }
}

//! Application configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file (`speaker.toml` in the working directory, or an explicit path), then
//! `SPEAKER_*` environment variables with `__` separating nested keys, e.g.
//! `SPEAKER_STORAGE__BACKEND=sqlite`.
//!
//! The conventional Google variables `GOOGLE_API_KEY`, `GOOGLE_ACCESS_TOKEN`
//! and `GOOGLE_CLOUD_PROJECT` fill in credentials that are still unset.

use std::fmt;
use std::path::{Path, PathBuf};

use ai_intent::IntentConfig;
use ai_speech::{DEFAULT_PLAYER, SpeechConfig};
use application::{AssistantConfig, RouterConfig};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::retry::RetryConfig;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "SPEAKER";

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "speaker";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Speech-to-text and text-to-speech
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Intent detection
    #[serde(default)]
    pub intent: IntentConfig,

    /// Event store and query log
    #[serde(default)]
    pub storage: StorageConfig,

    /// Responses and playback
    #[serde(default)]
    pub assistant: AssistantAppConfig,

    /// Retry policy for the cloud services
    #[serde(default)]
    pub retry: RetryConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which event store backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// `entry/<n>.txt` and `timestamp/<n>.txt` files
    #[default]
    File,
    /// A single SQLite database
    Sqlite,
    /// Process memory; nothing survives the run
    Memory,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Sqlite => write!(f, "sqlite"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// Event store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend selection
    #[serde(default)]
    pub backend: StorageBackend,

    /// Root directory for all data files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// SQLite file name, relative to `data_dir`
    #[serde(default = "default_sqlite_file")]
    pub sqlite_file: String,

    /// Append every reported event to `queries.txt`
    #[serde(default = "default_true")]
    pub query_log: bool,

    /// SQLite connection pool size
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_sqlite_file() -> String {
    "events.db".to_string()
}

const fn default_true() -> bool {
    true
}

const fn default_max_connections() -> u32 {
    2
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: default_data_dir(),
            sqlite_file: default_sqlite_file(),
            query_log: default_true(),
            max_connections: default_max_connections(),
        }
    }
}

impl StorageConfig {
    /// Full path of the SQLite database
    #[must_use]
    pub fn sqlite_path(&self) -> PathBuf {
        self.data_dir.join(&self.sqlite_file)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.data_dir.as_os_str().is_empty() {
            return Err("Data directory must not be empty".to_string());
        }
        if self.backend == StorageBackend::Sqlite {
            if self.sqlite_file.trim().is_empty() {
                return Err("SQLite file name must not be empty".to_string());
            }
            if self.max_connections == 0 {
                return Err("SQLite pool needs at least one connection".to_string());
            }
        }
        Ok(())
    }
}

/// Response wording and playback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantAppConfig {
    /// Reply when no event matched or the intent is not handled
    #[serde(default = "default_negative_response")]
    pub negative_response: String,

    /// Ask the user to rephrase below this intent confidence; unset disables it
    #[serde(default)]
    pub min_confidence: Option<f32>,

    /// Reply used when confidence is too low
    #[serde(default = "default_rephrase_prompt")]
    pub rephrase_prompt: String,

    /// Reply to a recorded event when the agent sent no fulfillment text
    #[serde(default = "default_acknowledgement")]
    pub acknowledgement: String,

    /// Start an external player after synthesis
    #[serde(default = "default_true")]
    pub playback: bool,

    /// Player executable
    #[serde(default = "default_player")]
    pub player_command: String,

    /// Arguments placed before the audio file path
    #[serde(default)]
    pub player_args: Vec<String>,

    /// Directory for `output.mp3`; defaults to the data directory
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

fn default_negative_response() -> String {
    RouterConfig::default().negative_response
}

fn default_rephrase_prompt() -> String {
    RouterConfig::default().rephrase_prompt
}

fn default_acknowledgement() -> String {
    RouterConfig::default().acknowledgement
}

fn default_player() -> String {
    DEFAULT_PLAYER.to_string()
}

impl Default for AssistantAppConfig {
    fn default() -> Self {
        Self {
            negative_response: default_negative_response(),
            min_confidence: None,
            rephrase_prompt: default_rephrase_prompt(),
            acknowledgement: default_acknowledgement(),
            playback: default_true(),
            player_command: default_player(),
            player_args: Vec::new(),
            output_dir: None,
        }
    }
}

impl AssistantAppConfig {
    /// Router settings derived from this section
    #[must_use]
    pub fn router_config(&self) -> RouterConfig {
        RouterConfig {
            negative_response: self.negative_response.clone(),
            min_confidence: self.min_confidence,
            rephrase_prompt: self.rephrase_prompt.clone(),
            acknowledgement: self.acknowledgement.clone(),
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(threshold) = self.min_confidence {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(format!(
                    "Minimum confidence must be between 0.0 and 1.0, got {threshold}"
                ));
            }
        }
        if self.negative_response.trim().is_empty() {
            return Err("Negative response must not be empty".to_string());
        }
        if self.min_confidence.is_some() && self.rephrase_prompt.trim().is_empty() {
            return Err("Rephrase prompt must not be empty".to_string());
        }
        if self.acknowledgement.trim().is_empty() {
            return Err("Acknowledgement must not be empty".to_string());
        }
        if self.playback && self.player_command.trim().is_empty() {
            return Err("Player command must not be empty when playback is enabled".to_string());
        }
        Ok(())
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Output format
    #[serde(default)]
    pub format: LogFormat,

    /// Default filter directive; `RUST_LOG` takes precedence
    #[serde(default)]
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            filter: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, an optional file and the environment
    ///
    /// With `path` set the file must exist; otherwise `speaker.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let builder = config::Config::builder()
            .set_default("storage.backend", "file")?
            .set_default("storage.data_dir", ".")?
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut app: Self = builder.build()?.try_deserialize()?;
        app.apply_google_env(|name| std::env::var(name).ok());
        Ok(app)
    }

    /// Fill unset credentials from the conventional Google variables
    pub fn apply_google_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("GOOGLE_API_KEY") {
            if self.speech.api_key.is_none() && self.speech.access_token.is_none() {
                self.speech.api_key = Some(SecretString::from(key.clone()));
            }
            if self.intent.api_key.is_none() && self.intent.access_token.is_none() {
                self.intent.api_key = Some(SecretString::from(key));
            }
        }

        if let Some(token) = non_empty("GOOGLE_ACCESS_TOKEN") {
            if self.speech.api_key.is_none() && self.speech.access_token.is_none() {
                self.speech.access_token = Some(SecretString::from(token.clone()));
            }
            if self.intent.api_key.is_none() && self.intent.access_token.is_none() {
                self.intent.access_token = Some(SecretString::from(token));
            }
        }

        if self.intent.project_id.is_empty() {
            if let Some(project) = non_empty("GOOGLE_CLOUD_PROJECT") {
                self.intent.project_id = project;
            }
        }
    }

    /// Assistant pipeline settings derived from this configuration
    #[must_use]
    pub const fn assistant_config(&self) -> AssistantConfig {
        AssistantConfig {
            use_ssml: self.speech.use_ssml,
        }
    }

    /// Directory synthesized audio is written to
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.assistant
            .output_dir
            .clone()
            .unwrap_or_else(|| self.storage.data_dir.clone())
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns the first problem found, prefixed with its section name.
    pub fn validate(&self) -> Result<(), String> {
        self.speech.validate().map_err(|e| format!("speech: {e}"))?;
        self.intent.validate().map_err(|e| format!("intent: {e}"))?;
        self.storage.validate().map_err(|e| format!("storage: {e}"))?;
        self.assistant
            .validate()
            .map_err(|e| format!("assistant: {e}"))?;
        self.retry.validate().map_err(|e| format!("retry: {e}"))?;
        Ok(())
    }
}

//! Configuration for speech processing

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::types::AudioEncoding;

/// Configuration for the Google speech services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// API key sent as the `key` query parameter
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// OAuth access token sent as a bearer token
    #[serde(default, skip_serializing)]
    pub access_token: Option<SecretString>,

    /// Speech-to-Text API base URL
    #[serde(default = "default_stt_base_url")]
    pub stt_base_url: String,

    /// Text-to-Speech API base URL
    #[serde(default = "default_tts_base_url")]
    pub tts_base_url: String,

    /// Sample rate of the input audio
    #[serde(default = "default_sample_rate_hertz")]
    pub sample_rate_hertz: u32,

    /// Voice name, e.g. "en-US-Wavenet-F"; the service picks one when unset
    #[serde(default)]
    pub voice_name: Option<String>,

    /// Preferred voice gender when no voice name is set
    #[serde(default)]
    pub ssml_gender: SsmlGender,

    /// Encoding of synthesized audio
    #[serde(default = "default_output_encoding")]
    pub output_encoding: AudioEncoding,

    /// TTS speaking rate (0.25 to 4.0)
    #[serde(default = "default_speaking_rate")]
    pub speaking_rate: f32,

    /// Send responses to TTS as SSML
    #[serde(default = "default_use_ssml")]
    pub use_ssml: bool,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Voice gender requested from the synthesizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SsmlGender {
    /// Let the service decide
    #[default]
    Neutral,
    /// Female voice
    Female,
    /// Male voice
    Male,
}

fn default_stt_base_url() -> String {
    "https://speech.googleapis.com/v1".to_string()
}

fn default_tts_base_url() -> String {
    "https://texttospeech.googleapis.com/v1".to_string()
}

const fn default_sample_rate_hertz() -> u32 {
    16_000
}

const fn default_output_encoding() -> AudioEncoding {
    AudioEncoding::Mp3
}

const fn default_speaking_rate() -> f32 {
    1.0
}

const fn default_use_ssml() -> bool {
    true
}

const fn default_timeout_ms() -> u64 {
    30000 // 30 seconds
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            access_token: None,
            stt_base_url: default_stt_base_url(),
            tts_base_url: default_tts_base_url(),
            sample_rate_hertz: default_sample_rate_hertz(),
            voice_name: None,
            ssml_gender: SsmlGender::default(),
            output_encoding: default_output_encoding(),
            speaking_rate: default_speaking_rate(),
            use_ssml: default_use_ssml(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl SpeechConfig {
    /// Create a minimal config for testing
    #[cfg(test)]
    pub fn test() -> Self {
        Self {
            api_key: Some(SecretString::from("test-key")),
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.is_none() && self.access_token.is_none() {
            return Err("Either an API key or an access token is required".to_string());
        }

        if !(0.25..=4.0).contains(&self.speaking_rate) {
            return Err(format!(
                "Speaking rate must be between 0.25 and 4.0, got {}",
                self.speaking_rate
            ));
        }

        if !(8_000..=48_000).contains(&self.sample_rate_hertz) {
            return Err(format!(
                "Sample rate must be between 8000 and 48000 Hz, got {}",
                self.sample_rate_hertz
            ));
        }

        if self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        if self.output_encoding == AudioEncoding::Flac {
            return Err("FLAC is not a supported synthesis encoding".to_string());
        }

        Ok(())
    }
}

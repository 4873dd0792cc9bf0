//! Types for speech processing
//!
//! Contains data structures for audio sources, encodings, transcriptions and
//! synthesis input.

use std::{fmt, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::ssml;

/// URI scheme of Google Cloud Storage objects
pub const CLOUD_STORAGE_SCHEME: &str = "gs://";

/// Audio encodings understood by the Google speech APIs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioEncoding {
    /// Uncompressed 16-bit signed little-endian samples
    Linear16,
    /// Free Lossless Audio Codec
    Flac,
    /// MPEG Audio Layer III
    Mp3,
    /// Opus in an Ogg container
    OggOpus,
}

impl AudioEncoding {
    /// Name used in API request bodies
    #[must_use]
    pub const fn as_api_str(&self) -> &'static str {
        match self {
            Self::Linear16 => "LINEAR16",
            Self::Flac => "FLAC",
            Self::Mp3 => "MP3",
            Self::OggOpus => "OGG_OPUS",
        }
    }

    /// Get the file extension for this encoding
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Linear16 => "wav",
            Self::Flac => "flac",
            Self::Mp3 => "mp3",
            Self::OggOpus => "ogg",
        }
    }
}

impl fmt::Display for AudioEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_str())
    }
}

/// Where the audio to transcribe lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    /// An object in Google Cloud Storage, passed to the API by URI
    CloudStorage(String),
    /// A file on the local filesystem, uploaded inline
    LocalFile(PathBuf),
}

impl AudioSource {
    /// Classify a path or URI
    #[must_use]
    pub fn parse(path: &str) -> Self {
        if path.starts_with(CLOUD_STORAGE_SCHEME) {
            Self::CloudStorage(path.to_string())
        } else {
            Self::LocalFile(PathBuf::from(path))
        }
    }

    /// Encoding inferred from the location
    ///
    /// Cloud objects are assumed to be FLAC. Local files are FLAC when named
    /// `.flac` and LINEAR16 otherwise.
    #[must_use]
    pub fn encoding(&self) -> AudioEncoding {
        match self {
            Self::CloudStorage(_) => AudioEncoding::Flac,
            Self::LocalFile(path) => {
                let is_flac = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("flac"));
                if is_flac {
                    AudioEncoding::Flac
                } else {
                    AudioEncoding::Linear16
                }
            },
        }
    }
}

impl fmt::Display for AudioSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CloudStorage(uri) => f.write_str(uri),
            Self::LocalFile(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Container for audio bytes with their encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioData {
    data: Vec<u8>,
    encoding: AudioEncoding,
}

impl AudioData {
    /// Create new audio data
    #[must_use]
    pub const fn new(data: Vec<u8>, encoding: AudioEncoding) -> Self {
        Self { data, encoding }
    }

    /// Get the raw audio bytes
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume and return the raw audio bytes
    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Get the audio encoding
    #[must_use]
    pub const fn encoding(&self) -> AudioEncoding {
        self.encoding
    }

    /// Get the size in bytes
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Check if the audio data is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Result of a speech-to-text request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    /// Transcribed text
    pub text: String,
    /// Mean confidence of the chosen alternatives, if reported
    pub confidence: Option<f32>,
    /// Language the audio was recognized in
    pub language: Option<String>,
}

impl Transcription {
    /// Create a transcription with just text
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: None,
            language: None,
        }
    }

    /// Set the confidence
    #[must_use]
    pub const fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Set the language
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Text to synthesize
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisInput {
    /// Plain text
    Text(String),
    /// A complete SSML document
    Ssml(String),
}

impl SynthesisInput {
    /// Build input from plain text, wrapping it as SSML when requested
    #[must_use]
    pub fn from_text(text: &str, as_ssml: bool) -> Self {
        if as_ssml {
            Self::Ssml(ssml::to_ssml(text))
        } else {
            Self::Text(text.to_string())
        }
    }

    /// The text or markup
    #[must_use]
    pub fn content(&self) -> &str {
        match self {
            Self::Text(s) | Self::Ssml(s) => s,
        }
    }

    /// Check if there is nothing to say
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Ssml(s) => ssml::is_blank(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cloud_storage_uri_is_detected() {
        let source = AudioSource::parse("gs://bucket/audio.flac");
        assert_eq!(
            source,
            AudioSource::CloudStorage("gs://bucket/audio.flac".to_string())
        );
        assert_eq!(source.encoding(), AudioEncoding::Flac);
    }

    #[test]
    fn cloud_storage_is_flac_regardless_of_name() {
        assert_eq!(
            AudioSource::parse("gs://bucket/audio.raw").encoding(),
            AudioEncoding::Flac
        );
    }

    #[test]
    fn local_paths_are_files() {
        let source = AudioSource::parse("recordings/speech.wav");
        assert_eq!(
            source,
            AudioSource::LocalFile(PathBuf::from("recordings/speech.wav"))
        );
        assert_eq!(source.encoding(), AudioEncoding::Linear16);
    }

    #[test]
    fn local_flac_is_flac() {
        assert_eq!(
            AudioSource::parse("speech.FLAC").encoding(),
            AudioEncoding::Flac
        );
    }

    #[test]
    fn raw_and_extensionless_are_linear16() {
        assert_eq!(
            AudioSource::parse("speech.raw").encoding(),
            AudioEncoding::Linear16
        );
        assert_eq!(AudioSource::parse("speech").encoding(), AudioEncoding::Linear16);
    }

    #[test]
    fn gs_prefix_must_be_leading() {
        let source = AudioSource::parse("./gs://not-a-bucket");
        assert!(matches!(source, AudioSource::LocalFile(_)));
    }

    #[test]
    fn encoding_serializes_like_the_api() {
        assert_eq!(
            serde_json::to_string(&AudioEncoding::Linear16).unwrap(),
            "\"LINEAR16\""
        );
        assert_eq!(
            serde_json::to_string(&AudioEncoding::OggOpus).unwrap(),
            "\"OGG_OPUS\""
        );
        assert_eq!(AudioEncoding::Mp3.to_string(), "MP3");
    }

    #[test]
    fn encoding_file_metadata() {
        assert_eq!(AudioEncoding::Mp3.extension(), "mp3");
        assert_eq!(AudioEncoding::Flac.extension(), "flac");
    }

    #[test]
    fn audio_data_accessors() {
        let audio = AudioData::new(vec![1, 2, 3], AudioEncoding::Mp3);
        assert_eq!(audio.size_bytes(), 3);
        assert!(!audio.is_empty());
        assert_eq!(audio.encoding(), AudioEncoding::Mp3);
        assert_eq!(audio.into_data(), vec![1, 2, 3]);
    }

    #[test]
    fn synthesis_input_wraps_ssml() {
        let input = SynthesisInput::from_text("Tom & Jerry", true);
        assert_eq!(
            input,
            SynthesisInput::Ssml("<speak>Tom &amp; Jerry</speak>".to_string())
        );
        assert!(!input.is_empty());
    }

    #[test]
    fn synthesis_input_plain() {
        let input = SynthesisInput::from_text("no", false);
        assert_eq!(input.content(), "no");
    }

    #[test]
    fn blank_input_is_empty() {
        assert!(SynthesisInput::from_text("  ", false).is_empty());
        assert!(SynthesisInput::from_text("", true).is_empty());
    }

    #[test]
    fn transcription_builder() {
        let t = Transcription::new("hello")
            .with_confidence(0.9)
            .with_language("en-US");
        assert_eq!(t.text, "hello");
        assert_eq!(t.confidence, Some(0.9));
        assert_eq!(t.language.as_deref(), Some("en-US"));
    }
}

//! AI Speech - Speech-to-Text and Text-to-Speech for the assistant
//!
//! Provides traits and implementations for speech processing:
//! - `SpeechToText` - Transcribe audio to text (STT)
//! - `TextToSpeech` - Synthesize speech from text or SSML (TTS)
//! - `AudioPlayer` - Write synthesized audio and start an external player
//!
//! # Architecture
//!
//! This crate follows the ports & adapters pattern:
//! - `ports` module defines the traits (ports)
//! - `providers` module contains concrete implementations (adapters)
//!
//! # Supported Providers
//!
//! - Google Cloud Speech-to-Text and Text-to-Speech (REST, v1)
//!
//! # Example
//!
//! ```ignore
//! use ai_speech::{AudioSource, GoogleSpeechProvider, SpeechToText, SynthesisInput, TextToSpeech};
//!
//! let provider = GoogleSpeechProvider::new(config)?;
//!
//! let source = AudioSource::parse("gs://bucket/speech.flac");
//! let transcription = provider.transcribe(&source, "en-US").await?;
//!
//! let input = SynthesisInput::from_text("Okay, I'll remember that", true);
//! let audio = provider.synthesize(&input, "en-US").await?;
//! ```

pub mod config;
pub mod error;
pub mod playback;
pub mod ports;
pub mod providers;
pub mod ssml;
pub mod types;

pub use config::{SpeechConfig, SsmlGender};
pub use error::SpeechError;
pub use playback::{AudioPlayer, DEFAULT_PLAYER, PlaybackOutcome};
pub use ports::{SpeechToText, TextToSpeech};
pub use providers::google::GoogleSpeechProvider;
pub use types::{AudioData, AudioEncoding, AudioSource, SynthesisInput, Transcription};

//! Infrastructure adapters
//!
//! Adapters connect application ports to the speech, intent and playback clients.

mod intent_adapter;
mod playback_adapter;
mod speech_adapter;

pub use intent_adapter::IntentAdapter;
pub use playback_adapter::PlaybackAdapter;
pub use speech_adapter::SpeechAdapter;

//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod event_store_port;
mod intent_port;
mod playback_port;
mod query_log_port;
mod synthesis_port;
mod transcription_port;

pub use event_store_port::EventStorePort;
#[cfg(test)]
pub use event_store_port::MockEventStorePort;
pub use intent_port::IntentPort;
#[cfg(test)]
pub use intent_port::MockIntentPort;
#[cfg(test)]
pub use playback_port::MockPlaybackPort;
pub use playback_port::{PlaybackPort, PlaybackReport};
#[cfg(test)]
pub use query_log_port::MockQueryLogPort;
pub use query_log_port::QueryLogPort;
#[cfg(test)]
pub use synthesis_port::MockSynthesisPort;
pub use synthesis_port::{AudioEncoding, SynthesisPort, SynthesisResult, Utterance};
#[cfg(test)]
pub use transcription_port::MockTranscriptionPort;
pub use transcription_port::{TranscriptionPort, TranscriptionResult};

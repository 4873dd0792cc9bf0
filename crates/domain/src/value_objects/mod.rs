//! Value Objects - Immutable, identity-less domain primitives

mod confidence;
mod elapsed;
mod event_id;
mod event_timestamp;
mod language_code;
mod session_id;

pub use confidence::Confidence;
pub use elapsed::Elapsed;
pub use event_id::EventId;
pub use event_timestamp::EventTimestamp;
pub use language_code::LanguageCode;
pub use session_id::SessionId;

//! AI Intent - Natural language understanding for the assistant
//!
//! Sends transcripts to a Dialogflow ES agent and turns the agent's answer
//! into a [`domain::QueryResult`]: the intent label, its confidence, the
//! response text authored in the agent and the extracted parameters.

pub mod config;
pub mod dialogflow;
pub mod error;
pub mod ports;
pub mod session;

pub use config::IntentConfig;
pub use dialogflow::DialogflowClient;
pub use error::IntentError;
pub use ports::IntentDetector;
pub use session::SessionPath;

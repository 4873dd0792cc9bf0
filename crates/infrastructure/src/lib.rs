//! Infrastructure layer - Adapters for external systems
//!
//! Implements the ports defined in the application layer: Google speech and
//! Dialogflow adapters with retries, audio playback, the event store backends
//! and the query log. Also owns configuration loading and logging setup.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod retry;
pub mod telemetry;

pub use adapters::*;
pub use config::{
    AppConfig, AssistantAppConfig, LogFormat, LoggingConfig, StorageBackend, StorageConfig,
};
pub use persistence::{
    FileEventStore, FileQueryLog, InMemoryEventStore, SqliteEventStore, open_event_store,
    open_query_log,
};
pub use retry::{RetryConfig, RetryResult, Retryable, with_retry};
pub use telemetry::{TelemetryError, init_logging};

//! Persistence module
//!
//! Event store backends (flat files, SQLite, memory) and the query log.

pub mod connection;
mod file_event_store;
mod memory_event_store;
mod query_log;
mod sqlite_event_store;

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::{EventStorePort, QueryLogPort};
use tracing::info;

pub use connection::{ConnectionPool, DatabaseError, create_pool};
pub use file_event_store::FileEventStore;
pub use memory_event_store::InMemoryEventStore;
pub use query_log::{FileQueryLog, QUERY_LOG_FILE};
pub use sqlite_event_store::SqliteEventStore;

use crate::config::{StorageBackend, StorageConfig};

/// Open the configured event store backend
///
/// # Errors
///
/// Returns `ApplicationError::Storage` if the backend cannot be opened.
pub fn open_event_store(config: &StorageConfig) -> Result<Arc<dyn EventStorePort>, ApplicationError> {
    info!(backend = %config.backend, data_dir = %config.data_dir.display(), "Opening event store");

    let store: Arc<dyn EventStorePort> = match config.backend {
        StorageBackend::File => Arc::new(FileEventStore::open(&config.data_dir)?),
        StorageBackend::Sqlite => {
            let pool = create_pool(&config.sqlite_path(), config.max_connections)
                .map_err(|e| ApplicationError::Storage(e.to_string()))?;
            Arc::new(SqliteEventStore::new(pool)?)
        },
        StorageBackend::Memory => Arc::new(InMemoryEventStore::new()),
    };
    Ok(store)
}

/// The query log, when enabled
#[must_use]
pub fn open_query_log(config: &StorageConfig) -> Option<Arc<dyn QueryLogPort>> {
    config
        .query_log
        .then(|| Arc::new(FileQueryLog::in_dir(&config.data_dir)) as Arc<dyn QueryLogPort>)
}

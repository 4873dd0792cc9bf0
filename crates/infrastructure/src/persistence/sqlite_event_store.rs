//! SQLite event store implementation

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::EventStorePort;
use async_trait::async_trait;
use domain::{EventId, EventRecord, EventTimestamp, NewEvent};
use parking_lot::Mutex;
use rusqlite::params;
use tracing::{debug, instrument, warn};

use super::connection::{ConnectionPool, DatabaseError, PooledConn};

/// SQLite-based event store
///
/// Identifiers are allocated in memory, like the file store, and inserted
/// explicitly so both backends number events the same way.
#[derive(Debug, Clone)]
pub struct SqliteEventStore {
    pool: ConnectionPool,
    next_id: Arc<Mutex<EventId>>,
}

impl SqliteEventStore {
    /// Create a store over an initialized pool
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Storage` if the highest existing id cannot be read.
    pub fn new(pool: ConnectionPool) -> Result<Self, ApplicationError> {
        let conn = pool.get().map_err(map_db_error)?;
        let highest: Option<i64> = conn
            .query_row("SELECT MAX(id) FROM events", [], |row| row.get(0))
            .map_err(map_sqlite_error)?;
        drop(conn);

        let next_id = match highest {
            Some(id) => from_row_id(id)?.next(),
            None => EventId::FIRST,
        };

        debug!(next_id = %next_id, "Opened SQLite event store");
        Ok(Self {
            pool,
            next_id: Arc::new(Mutex::new(next_id)),
        })
    }

    fn connection(pool: &ConnectionPool) -> Result<PooledConn, ApplicationError> {
        pool.get().map_err(map_db_error)
    }

    fn insert_blocking(
        pool: &ConnectionPool,
        next_id: &Mutex<EventId>,
        event: &NewEvent,
    ) -> Result<EventId, ApplicationError> {
        let conn = Self::connection(pool)?;
        let mut guard = next_id.lock();
        let id = *guard;
        *guard = id.next();

        conn.execute(
            "INSERT INTO events (id, entry_text, recorded_at) VALUES (?1, ?2, ?3)",
            params![
                to_row_id(id)?,
                event.entry_text,
                event.timestamp.to_storage_string()
            ],
        )
        .map_err(map_sqlite_error)?;

        Ok(id)
    }

    fn select_blocking(
        pool: &ConnectionPool,
        filter: Option<(&str, &str)>,
    ) -> Result<Vec<EventRecord>, ApplicationError> {
        let conn = Self::connection(pool)?;

        let rows: Vec<(i64, String, String)> = match filter {
            // instr() is case-sensitive and treats an empty needle as a match
            Some((verb, object)) => {
                let mut stmt = conn
                    .prepare(
                        "SELECT id, entry_text, recorded_at FROM events
                         WHERE instr(entry_text, ?1) > 0 AND instr(entry_text, ?2) > 0
                         ORDER BY id",
                    )
                    .map_err(map_sqlite_error)?;
                stmt.query_map(params![verb, object], |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
                })
                .map_err(map_sqlite_error)?
                .collect::<Result<_, _>>()
                .map_err(map_sqlite_error)?
            },
            None => {
                let mut stmt = conn
                    .prepare("SELECT id, entry_text, recorded_at FROM events ORDER BY id")
                    .map_err(map_sqlite_error)?;
                stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
                    .map_err(map_sqlite_error)?
                    .collect::<Result<_, _>>()
                    .map_err(map_sqlite_error)?
            },
        };

        let mut records = Vec::with_capacity(rows.len());
        for (id, entry_text, recorded_at) in rows {
            let id = from_row_id(id)?;
            match EventTimestamp::parse(&recorded_at) {
                Ok(timestamp) => records.push(NewEvent::new(entry_text, timestamp).into_record(id)),
                Err(e) => warn!(id = %id, error = %e, "Skipping event with unparsable timestamp"),
            }
        }
        Ok(records)
    }
}

#[async_trait]
impl EventStorePort for SqliteEventStore {
    #[instrument(skip(self, event), fields(text_len = event.entry_text.len()))]
    async fn append(&self, event: NewEvent) -> Result<EventId, ApplicationError> {
        let pool = self.pool.clone();
        let next_id = Arc::clone(&self.next_id);

        let id = tokio::task::spawn_blocking(move || {
            Self::insert_blocking(&pool, &next_id, &event)
        })
        .await
        .map_err(join_error)??;

        debug!(id = %id, "Recorded event");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn scan(&self) -> Result<Vec<EventRecord>, ApplicationError> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || Self::select_blocking(&pool, None))
            .await
            .map_err(join_error)?
    }

    #[instrument(skip(self))]
    async fn find_first(
        &self,
        verb: &str,
        object: &str,
    ) -> Result<Option<EventRecord>, ApplicationError> {
        let pool = self.pool.clone();
        let verb = verb.to_string();
        let object = object.to_string();

        let matches = tokio::task::spawn_blocking(move || {
            Self::select_blocking(&pool, Some((verb.as_str(), object.as_str())))
        })
        .await
        .map_err(join_error)??;

        Ok(matches.into_iter().next())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> Result<usize, ApplicationError> {
        let pool = self.pool.clone();
        let count: i64 = tokio::task::spawn_blocking(move || {
            Self::connection(&pool)?
                .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))
                .map_err(map_sqlite_error)
        })
        .await
        .map_err(join_error)??;

        usize::try_from(count).map_err(|e| ApplicationError::Storage(e.to_string()))
    }
}

fn to_row_id(id: EventId) -> Result<i64, ApplicationError> {
    i64::try_from(id.value())
        .map_err(|_| ApplicationError::Storage(format!("Event id {id} out of range")))
}

fn from_row_id(id: i64) -> Result<EventId, ApplicationError> {
    u64::try_from(id)
        .map(EventId::new)
        .map_err(|_| ApplicationError::Storage(format!("Negative event id {id} in database")))
}

fn map_db_error(e: r2d2::Error) -> ApplicationError {
    ApplicationError::Storage(DatabaseError::from(e).to_string())
}

fn map_sqlite_error(e: rusqlite::Error) -> ApplicationError {
    ApplicationError::Storage(DatabaseError::from(e).to_string())
}

fn join_error(err: tokio::task::JoinError) -> ApplicationError {
    ApplicationError::Internal(format!("Storage task failed: {err}"))
}

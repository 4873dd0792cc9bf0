//! Database connection management
//!
//! Provides SQLite connection pooling via r2d2.

use std::path::Path;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use thiserror::Error;
use tracing::{debug, info};

/// Path that selects a private in-memory database
pub const IN_MEMORY: &str = ":memory:";

/// Database errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Cannot create database directory: {0}")]
    Directory(String),
}

/// SQLite connection pool type alias
pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// Pooled connection type alias
pub type PooledConn = PooledConnection<SqliteConnectionManager>;

/// Create a new connection pool
///
/// Parent directories of `path` are created as needed. Pass [`IN_MEMORY`]
/// for a throwaway database; it is limited to one connection so every
/// caller sees the same data.
pub fn create_pool(path: &Path, max_connections: u32) -> Result<ConnectionPool, DatabaseError> {
    info!(path = %path.display(), max_connections, "Creating database connection pool");

    let (manager, max_size) = if path == Path::new(IN_MEMORY) {
        (SqliteConnectionManager::memory(), 1)
    } else {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DatabaseError::Directory(format!("{}: {e}", parent.display())))?;
            }
        }
        (SqliteConnectionManager::file(path), max_connections.max(1))
    };

    let pool = Pool::builder().max_size(max_size).build(manager)?;

    {
        let conn = pool.get()?;
        initialize_database(&conn)?;
    }

    debug!("Database connection pool created successfully");
    Ok(pool)
}

/// Connection settings and the `events` table
fn initialize_database(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = FULL;
        PRAGMA busy_timeout = 5000;

        CREATE TABLE IF NOT EXISTS events (
            id          INTEGER PRIMARY KEY,
            entry_text  TEXT NOT NULL,
            recorded_at TEXT NOT NULL
        );
        ",
    )?;
    Ok(())
}

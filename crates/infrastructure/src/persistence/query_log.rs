//! Plain-text query log
//!
//! Every reported event is appended to `queries.txt` as
//! `<query text> <YYYY-MM-DD HH:MM:SS>`, one per line.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use application::error::ApplicationError;
use application::ports::QueryLogPort;
use async_trait::async_trait;
use domain::EventTimestamp;
use tracing::instrument;

/// File name of the log inside the data directory
pub const QUERY_LOG_FILE: &str = "queries.txt";

/// Append-only query log file
#[derive(Debug, Clone)]
pub struct FileQueryLog {
    path: PathBuf,
}

impl FileQueryLog {
    /// Log to `queries.txt` inside `data_dir`
    #[must_use]
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(QUERY_LOG_FILE))
    }

    /// Log to an explicit file
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the log file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// One log line, newline included
    fn format_line(query_text: &str, at: EventTimestamp) -> String {
        format!("{query_text} {}\n", at.to_seconds_string())
    }
}

#[async_trait]
impl QueryLogPort for FileQueryLog {
    #[instrument(skip(self, query_text), fields(path = %self.path.display()))]
    async fn append(&self, query_text: &str, at: EventTimestamp) -> Result<(), ApplicationError> {
        let path = self.path.clone();
        let line = Self::format_line(query_text, at);

        tokio::task::spawn_blocking(move || {
            let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
            file.write_all(line.as_bytes())?;
            file.sync_data()
        })
        .await
        .map_err(|e| ApplicationError::Internal(format!("Query log task failed: {e}")))?
        .map_err(|e| ApplicationError::Storage(format!("Cannot append to query log: {e}")))
    }
}

//! Flat-file event store
//!
//! Layout under the store root:
//!
//! ```text
//! entry/<id>.txt      utterance text
//! timestamp/<id>.txt  YYYY-MM-DD HH:MM:SS.ffffff (UTC)
//! ```
//!
//! The timestamp file is written last, so an event only becomes visible to
//! scans once both halves are on disk.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::EventStorePort;
use async_trait::async_trait;
use domain::{EventId, EventRecord, EventTimestamp, NewEvent};
use parking_lot::Mutex;
use tracing::{debug, instrument, warn};

const ENTRY_DIR: &str = "entry";
const TIMESTAMP_DIR: &str = "timestamp";
const EXTENSION: &str = "txt";

/// Event store backed by one text file per field per event
#[derive(Debug, Clone)]
pub struct FileEventStore {
    root: PathBuf,
    next_id: Arc<Mutex<EventId>>,
}

impl FileEventStore {
    /// Open (or create) a store rooted at `root`
    ///
    /// The next identifier is one past the highest id found in either
    /// directory, so half-written events never have their id reused.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Storage` if the directories cannot be
    /// created or listed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, ApplicationError> {
        let root = root.into();
        for dir in [ENTRY_DIR, TIMESTAMP_DIR] {
            let path = root.join(dir);
            fs::create_dir_all(&path).map_err(|e| storage_error("create", &path, &e))?;
        }

        let highest = [ENTRY_DIR, TIMESTAMP_DIR]
            .iter()
            .map(|dir| list_ids(&root.join(dir)))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .flatten()
            .max();
        let next_id = highest.map_or(EventId::FIRST, EventId::next);

        debug!(root = %root.display(), next_id = %next_id, "Opened file event store");
        Ok(Self {
            root,
            next_id: Arc::new(Mutex::new(next_id)),
        })
    }

    fn entry_path(root: &Path, id: EventId) -> PathBuf {
        root.join(ENTRY_DIR).join(format!("{id}.{EXTENSION}"))
    }

    fn timestamp_path(root: &Path, id: EventId) -> PathBuf {
        root.join(TIMESTAMP_DIR).join(format!("{id}.{EXTENSION}"))
    }

    fn append_blocking(
        root: &Path,
        next_id: &Mutex<EventId>,
        event: &NewEvent,
    ) -> Result<EventId, ApplicationError> {
        let mut guard = next_id.lock();
        let id = *guard;
        // Burn the id before writing; a failed write must not hand it out again.
        *guard = id.next();

        let entry = Self::entry_path(root, id);
        write_synced(&entry, event.entry_text.as_bytes())
            .map_err(|e| storage_error("write", &entry, &e))?;

        let timestamp = Self::timestamp_path(root, id);
        write_synced(&timestamp, event.timestamp.to_storage_string().as_bytes())
            .map_err(|e| storage_error("write", &timestamp, &e))?;

        Ok(id)
    }

    fn scan_blocking(root: &Path) -> Result<Vec<EventRecord>, ApplicationError> {
        let mut ids = list_ids(&root.join(ENTRY_DIR))?;
        ids.sort_unstable();

        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(record) = Self::read_record(root, id)? {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Read one event; `None` when its timestamp is missing or unreadable
    fn read_record(root: &Path, id: EventId) -> Result<Option<EventRecord>, ApplicationError> {
        let timestamp_path = Self::timestamp_path(root, id);
        let raw_timestamp = match fs::read_to_string(&timestamp_path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(id = %id, "Skipping event without timestamp");
                return Ok(None);
            },
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!(id = %id, error = %e, "Skipping event with unreadable timestamp");
                return Ok(None);
            },
            Err(e) => return Err(storage_error("read", &timestamp_path, &e)),
        };

        let timestamp = match EventTimestamp::parse(&raw_timestamp) {
            Ok(ts) => ts,
            Err(e) => {
                warn!(id = %id, error = %e, "Skipping event with unparsable timestamp");
                return Ok(None);
            },
        };

        let entry_path = Self::entry_path(root, id);
        let entry_text = match fs::read_to_string(&entry_path) {
            Ok(text) => text,
            // Removed after listing, or not UTF-8
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::InvalidData) => {
                warn!(id = %id, error = %e, "Skipping event with unreadable entry");
                return Ok(None);
            },
            Err(e) => return Err(storage_error("read", &entry_path, &e)),
        };

        Ok(Some(NewEvent::new(entry_text, timestamp).into_record(id)))
    }
}

#[async_trait]
impl EventStorePort for FileEventStore {
    #[instrument(skip(self, event), fields(text_len = event.entry_text.len()))]
    async fn append(&self, event: NewEvent) -> Result<EventId, ApplicationError> {
        let root = self.root.clone();
        let next_id = Arc::clone(&self.next_id);

        let id = tokio::task::spawn_blocking(move || {
            Self::append_blocking(&root, &next_id, &event)
        })
        .await
        .map_err(join_error)??;

        debug!(id = %id, "Recorded event");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn scan(&self) -> Result<Vec<EventRecord>, ApplicationError> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || Self::scan_blocking(&root))
            .await
            .map_err(join_error)?
    }
}

/// Numeric `<id>.txt` stems in `dir`; anything else is ignored
fn list_ids(dir: &Path) -> Result<Vec<EventId>, ApplicationError> {
    let entries = fs::read_dir(dir).map_err(|e| storage_error("list", dir, &e))?;

    let mut ids = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| storage_error("list", dir, &e))?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
            continue;
        }
        match path.file_stem().and_then(|stem| stem.to_str()).map(str::parse::<EventId>) {
            Some(Ok(id)) => ids.push(id),
            _ => debug!(path = %path.display(), "Ignoring non-event file"),
        }
    }
    Ok(ids)
}

fn write_synced(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

fn storage_error(action: &str, path: &Path, err: &std::io::Error) -> ApplicationError {
    ApplicationError::Storage(format!("Cannot {action} {}: {err}", path.display()))
}

fn join_error(err: tokio::task::JoinError) -> ApplicationError {
    ApplicationError::Internal(format!("Storage task failed: {err}"))
}

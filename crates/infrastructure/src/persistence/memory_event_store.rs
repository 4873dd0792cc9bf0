//! In-memory event store

use application::error::ApplicationError;
use application::ports::EventStorePort;
use async_trait::async_trait;
use domain::{EventId, EventRecord, NewEvent};
use parking_lot::RwLock;

/// Event store that lives only as long as the process
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    records: RwLock<Vec<EventRecord>>,
}

impl InMemoryEventStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStorePort for InMemoryEventStore {
    async fn append(&self, event: NewEvent) -> Result<EventId, ApplicationError> {
        let mut records = self.records.write();
        let id = records.last().map_or(EventId::FIRST, |last| last.id.next());
        records.push(event.into_record(id));
        Ok(id)
    }

    async fn scan(&self) -> Result<Vec<EventRecord>, ApplicationError> {
        Ok(self.records.read().clone())
    }

    async fn count(&self) -> Result<usize, ApplicationError> {
        Ok(self.records.read().len())
    }
}

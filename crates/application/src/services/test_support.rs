//! Shared fakes for service tests

use async_trait::async_trait;
use domain::{EventId, EventRecord, NewEvent};
use parking_lot::Mutex;

use crate::{error::ApplicationError, ports::EventStorePort};

/// Vector-backed event store
#[derive(Debug, Default)]
pub struct VecEventStore {
    records: Mutex<Vec<EventRecord>>,
}

#[async_trait]
impl EventStorePort for VecEventStore {
    async fn append(&self, event: NewEvent) -> Result<EventId, ApplicationError> {
        let mut records = self.records.lock();
        let id = records
            .last()
            .map_or(EventId::FIRST, |last| last.id.next());
        records.push(event.into_record(id));
        Ok(id)
    }

    async fn scan(&self) -> Result<Vec<EventRecord>, ApplicationError> {
        Ok(self.records.lock().clone())
    }
}

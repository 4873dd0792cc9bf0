//! Event memory - Records reported events and answers "when did I...?"

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use domain::{Elapsed, EventId, EventRecord, EventTimestamp, NewEvent};
use tracing::{debug, instrument};

use crate::{error::ApplicationError, ports::EventStorePort};

/// Use cases over the event store
#[derive(Clone)]
pub struct EventMemory {
    store: Arc<dyn EventStorePort>,
}

impl fmt::Debug for EventMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventMemory").finish_non_exhaustive()
    }
}

impl EventMemory {
    /// Create an event memory over a store backend
    pub fn new(store: Arc<dyn EventStorePort>) -> Self {
        Self { store }
    }

    /// Remember that `text` was said at `timestamp`
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Storage` if the event cannot be persisted.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn record(
        &self,
        text: &str,
        timestamp: EventTimestamp,
    ) -> Result<EventId, ApplicationError> {
        let id = self.store.append(NewEvent::new(text, timestamp)).await?;
        debug!(%id, %timestamp, "Event recorded");
        Ok(id)
    }

    /// Oldest event whose text contains both `verb` and `object`
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Storage` if the store cannot be read.
    #[instrument(skip(self))]
    pub async fn find(
        &self,
        verb: &str,
        object: &str,
    ) -> Result<Option<EventRecord>, ApplicationError> {
        let found = self.store.find_first(verb, object).await?;
        debug!(found = found.is_some(), "Event lookup complete");
        Ok(found)
    }

    /// Time between `since` and `now`
    #[must_use]
    pub fn elapsed(since: EventTimestamp, now: DateTime<Utc>) -> Elapsed {
        since.elapsed_until(now)
    }
}

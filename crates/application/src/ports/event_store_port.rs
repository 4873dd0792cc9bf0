//! Event store port - Interface for persisting and scanning remembered events

use async_trait::async_trait;
use domain::{EventId, EventRecord, NewEvent};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for the append-only event log
///
/// Implementations allocate identifiers from a monotonic counter and must
/// return records in insertion order.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait EventStorePort: Send + Sync {
    /// Persist a new event and return its identifier
    ///
    /// The event must be durable before this returns.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Storage` if the backing medium is unwritable.
    async fn append(&self, event: NewEvent) -> Result<EventId, ApplicationError>;

    /// All stored events, oldest first
    async fn scan(&self) -> Result<Vec<EventRecord>, ApplicationError>;

    /// First event (oldest first) whose text contains both `verb` and `object`
    ///
    /// The default implementation filters [`scan`](Self::scan); backends with
    /// a query engine may push the filter down.
    async fn find_first(
        &self,
        verb: &str,
        object: &str,
    ) -> Result<Option<EventRecord>, ApplicationError> {
        Ok(self
            .scan()
            .await?
            .into_iter()
            .find(|record| record.mentions(verb, object)))
    }

    /// Number of stored events
    async fn count(&self) -> Result<usize, ApplicationError> {
        Ok(self.scan().await?.len())
    }
}

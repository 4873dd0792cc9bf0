//! Query log port - Append-only log of what the user reported

use async_trait::async_trait;
use domain::EventTimestamp;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for the plain-text query log
#[cfg_attr(test, automock)]
#[async_trait]
pub trait QueryLogPort: Send + Sync {
    /// Append one reported utterance
    async fn append(&self, query_text: &str, at: EventTimestamp) -> Result<(), ApplicationError>;
}

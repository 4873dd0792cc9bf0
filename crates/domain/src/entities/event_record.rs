//! A remembered event: something the user said happened, and when

use serde::{Deserialize, Serialize};

use crate::value_objects::{EventId, EventTimestamp};

/// An event that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    /// What the user said
    pub entry_text: String,
    /// When the user said it
    pub timestamp: EventTimestamp,
}

impl NewEvent {
    /// Create a new event
    #[must_use]
    pub fn new(entry_text: impl Into<String>, timestamp: EventTimestamp) -> Self {
        Self {
            entry_text: entry_text.into(),
            timestamp,
        }
    }

    /// Attach the identifier allocated by the store
    #[must_use]
    pub fn into_record(self, id: EventId) -> EventRecord {
        EventRecord {
            id,
            entry_text: self.entry_text,
            timestamp: self.timestamp,
        }
    }
}

/// A stored event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Sequence number assigned by the store
    pub id: EventId,
    /// What the user said
    pub entry_text: String,
    /// When the user said it
    pub timestamp: EventTimestamp,
}

impl EventRecord {
    /// Whether the entry text literally contains both words
    ///
    /// This is plain substring containment, not a structured match; an empty
    /// needle matches everything.
    #[must_use]
    pub fn mentions(&self, verb: &str, object: &str) -> bool {
        self.entry_text.contains(verb) && self.entry_text.contains(object)
    }
}

//! Structured result of intent detection

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entities::Intent;
use crate::errors::DomainError;
use crate::value_objects::Confidence;

/// Names of the slots the event intents extract
pub mod slots {
    /// The action, e.g. "watered"
    pub const VERB: &str = "verb";
    /// The thing acted upon, e.g. "plants"
    pub const OBJECT: &str = "object";
}

/// A single extracted slot value, resolved to text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotValue {
    /// The slot was extracted
    Present(String),
    /// The slot was absent, empty, or not textual
    Missing,
}

impl SlotValue {
    /// The value, or the empty string when missing
    #[must_use]
    pub fn or_empty(&self) -> &str {
        match self {
            Self::Present(value) => value,
            Self::Missing => "",
        }
    }

    /// Whether the slot was extracted
    #[must_use]
    pub const fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }
}

/// What the NLU service understood from one utterance
///
/// Read-only once produced. Slot values are kept in their raw JSON form so
/// that list-valued and scalar parameters are both supported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Text the intent was detected from
    pub query_text: String,
    /// Classified intent
    pub intent: Intent,
    /// Detection confidence
    pub confidence: Confidence,
    /// Response text authored in the agent
    pub fulfillment_text: String,
    /// Raw extracted parameters
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

impl QueryResult {
    /// Create a query result with no parameters
    #[must_use]
    pub fn new(
        query_text: impl Into<String>,
        intent: Intent,
        confidence: Confidence,
        fulfillment_text: impl Into<String>,
    ) -> Self {
        Self {
            query_text: query_text.into(),
            intent,
            confidence,
            fulfillment_text: fulfillment_text.into(),
            parameters: Map::new(),
        }
    }

    /// Add a raw parameter
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: Value) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }

    /// Replace all parameters
    #[must_use]
    pub fn with_parameters(mut self, parameters: Map<String, Value>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Resolve a slot to text
    ///
    /// List parameters resolve to their first element; scalar strings resolve
    /// to themselves. Empty strings and empty lists count as missing.
    #[must_use]
    pub fn slot(&self, name: &str) -> SlotValue {
        let value = match self.parameters.get(name) {
            Some(Value::Array(items)) => items.first().and_then(Value::as_str),
            Some(Value::String(s)) => Some(s.as_str()),
            _ => None,
        };

        match value {
            Some(text) if !text.is_empty() => SlotValue::Present(text.to_string()),
            _ => SlotValue::Missing,
        }
    }

    /// Resolve a slot, failing when it was not extracted
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingParameter` if the slot is missing.
    pub fn require_slot(&self, name: &str) -> Result<String, DomainError> {
        match self.slot(name) {
            SlotValue::Present(value) => Ok(value),
            SlotValue::Missing => Err(DomainError::missing_parameter(name)),
        }
    }

    /// The `verb` slot
    #[must_use]
    pub fn verb(&self) -> SlotValue {
        self.slot(slots::VERB)
    }

    /// The `object` slot
    #[must_use]
    pub fn object(&self) -> SlotValue {
        self.slot(slots::OBJECT)
    }
}

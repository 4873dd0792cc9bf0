//! Intent labels produced by the NLU agent

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classified intent of an utterance
///
/// Only the two event intents drive behavior; anything else is carried
/// through verbatim so it can be logged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Intent {
    /// The user is telling the assistant something happened ("I took my pills")
    EventDetect,
    /// The user is asking when something happened ("When did I take my pills?")
    EventQuestion,
    /// Any other label, including the agent's fallback intent
    Other(String),
}

impl Intent {
    /// Label of the "something happened" intent
    pub const EVENT_DETECT: &'static str = "event.detect";

    /// Label of the "when did it happen" intent
    pub const EVENT_QUESTION: &'static str = "event.question";

    /// Map an agent display name to an intent
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            Self::EVENT_DETECT => Self::EventDetect,
            Self::EVENT_QUESTION => Self::EventQuestion,
            other => Self::Other(other.to_string()),
        }
    }

    /// The agent display name for this intent
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::EventDetect => Self::EVENT_DETECT,
            Self::EventQuestion => Self::EVENT_QUESTION,
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for Intent {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<Intent> for String {
    fn from(intent: Intent) -> Self {
        intent.label().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_labels() {
        assert_eq!(Intent::from_label("event.detect"), Intent::EventDetect);
        assert_eq!(Intent::from_label("event.question"), Intent::EventQuestion);
    }

    #[test]
    fn keeps_unknown_labels() {
        let intent = Intent::from_label("Default Fallback Intent");
        assert_eq!(intent, Intent::Other("Default Fallback Intent".to_string()));
        assert_eq!(intent.label(), "Default Fallback Intent");
    }

    #[test]
    fn labels_are_case_sensitive() {
        assert!(matches!(Intent::from_label("Event.Detect"), Intent::Other(_)));
    }


    #[test]
    fn serializes_as_label() {
        let json = serde_json::to_string(&Intent::EventQuestion).unwrap();
        assert_eq!(json, "\"event.question\"");
        let back: Intent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Intent::EventQuestion);
    }
}

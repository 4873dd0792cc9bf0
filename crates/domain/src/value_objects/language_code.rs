//! BCP-47 style language code (e.g. `en-US`)

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Language code sent to the speech and intent services
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Default language of the assistant
    pub const DEFAULT: &'static str = "en-US";

    /// Parse a language code
    ///
    /// Accepts one or more alphanumeric subtags separated by `-`, where the
    /// primary subtag is 2-3 letters.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidLanguageCode` if the code is malformed.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidLanguageCode(s.to_string());
        let mut subtags = s.split('-');

        let primary = subtags.next().ok_or_else(invalid)?;
        if !(2..=3).contains(&primary.len()) || !primary.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(invalid());
        }

        for tag in subtags {
            if tag.is_empty() || tag.len() > 8 || !tag.chars().all(|c| c.is_ascii_alphanumeric())
            {
                return Err(invalid());
            }
        }

        Ok(Self(s.to_string()))
    }

    /// Borrow the code as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for LanguageCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}

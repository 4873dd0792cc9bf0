//! Intent detection confidence score
//!
//! ```
//! use domain::value_objects::Confidence;
//!
//! let c = Confidence::new(0.87).expect("valid confidence");
//! assert!(c.is_at_least(0.5));
//! assert!(Confidence::new(1.2).is_err());
//! assert_eq!(Confidence::clamped(1.2).value(), 1.0);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Confidence score in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Confidence(f32);

impl Confidence {
    /// Create a validated confidence score
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidConfidence` if the value is NaN or outside
    /// of `[0, 1]`.
    pub fn new(value: f32) -> Result<Self, DomainError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::InvalidConfidence(value))
        }
    }

    /// Create a confidence score, clamping to the valid range
    ///
    /// NaN maps to zero.
    #[must_use]
    pub fn clamped(value: f32) -> Self {
        if value.is_nan() {
            Self(0.0)
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    /// Get the raw score
    #[must_use]
    pub const fn value(self) -> f32 {
        self.0
    }

    /// Whether the score meets a threshold
    #[must_use]
    pub fn is_at_least(self, threshold: f32) -> bool {
        self.0 >= threshold
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

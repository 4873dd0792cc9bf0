//! Elapsed time between a remembered event and now

use std::fmt;

use chrono::{DateTime, Utc};

/// Non-negative span of time, reported in whole minutes for phrasing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Elapsed {
    seconds: u64,
}

impl Elapsed {
    /// Span from `since` to `now`
    ///
    /// Clock skew that puts `since` in the future yields zero.
    #[must_use]
    pub fn between(since: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let seconds = now.signed_duration_since(since).num_seconds();
        Self {
            seconds: u64::try_from(seconds).unwrap_or(0),
        }
    }

    /// Span of an exact number of seconds
    #[must_use]
    pub const fn from_seconds(seconds: u64) -> Self {
        Self { seconds }
    }

    /// Whole seconds
    #[must_use]
    pub const fn whole_seconds(self) -> u64 {
        self.seconds
    }

    /// Whole minutes (`seconds / 60`, rounded down)
    #[must_use]
    pub const fn whole_minutes(self) -> u64 {
        self.seconds / 60
    }
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} minutes", self.whole_minutes())
    }
}

//! Timestamp attached to a remembered event

use std::fmt;

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::Elapsed;

/// UTC instant with microsecond precision
///
/// Persisted as `YYYY-MM-DD HH:MM:SS.ffffff`. Parsing also accepts the
/// second-precision form `YYYY-MM-DD HH:MM:SS` written by older logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventTimestamp(DateTime<Utc>);

impl EventTimestamp {
    /// Storage format with microseconds
    pub const FORMAT: &'static str = "%Y-%m-%d %H:%M:%S%.6f";

    /// Second-precision format used by the query log
    pub const SECONDS_FORMAT: &'static str = "%Y-%m-%d %H:%M:%S";

    /// Capture the current instant
    #[must_use]
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Wrap an existing instant, truncating to microseconds
    #[must_use]
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(at.trunc_subsecs(6))
    }

    /// Parse the persisted text form
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimestamp` if neither accepted format matches.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let trimmed = s.trim();
        NaiveDateTime::parse_from_str(trimmed, Self::FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(trimmed, Self::SECONDS_FORMAT))
            .map(|naive| Self(naive.and_utc()))
            .map_err(|_| DomainError::InvalidTimestamp(s.to_string()))
    }

    /// The underlying instant
    #[must_use]
    pub const fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Persisted text form with microseconds
    #[must_use]
    pub fn to_storage_string(&self) -> String {
        self.0.format(Self::FORMAT).to_string()
    }

    /// Text form truncated to whole seconds
    #[must_use]
    pub fn to_seconds_string(&self) -> String {
        self.0.format(Self::SECONDS_FORMAT).to_string()
    }

    /// Time elapsed between this timestamp and `now`
    #[must_use]
    pub fn elapsed_until(&self, now: DateTime<Utc>) -> Elapsed {
        Elapsed::between(self.0, now)
    }
}

impl fmt::Display for EventTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_storage_string())
    }
}

impl From<DateTime<Utc>> for EventTimestamp {
    fn from(at: DateTime<Utc>) -> Self {
        Self::from_datetime(at)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn fixed() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 2, 14, 9, 30, 5).unwrap() + Duration::microseconds(123_456)
    }

    #[test]
    fn storage_string_has_microseconds() {
        let ts = EventTimestamp::from_datetime(fixed());
        assert_eq!(ts.to_storage_string(), "2019-02-14 09:30:05.123456");
    }

    #[test]
    fn seconds_string_drops_fraction() {
        let ts = EventTimestamp::from_datetime(fixed());
        assert_eq!(ts.to_seconds_string(), "2019-02-14 09:30:05");
    }

    #[test]
    fn parse_restores_storage_string() {
        let ts = EventTimestamp::from_datetime(fixed());
        let parsed = EventTimestamp::parse(&ts.to_storage_string()).unwrap();
        assert_eq!(parsed, ts);
    }

    #[test]
    fn parse_accepts_seconds_precision() {
        let parsed = EventTimestamp::parse("2019-02-14 09:30:05\n").unwrap();
        assert_eq!(
            parsed.as_datetime(),
            Utc.with_ymd_and_hms(2019, 2, 14, 9, 30, 5).unwrap()
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(EventTimestamp::parse("last tuesday").is_err());
        assert!(EventTimestamp::parse("").is_err());
    }

    #[test]
    fn from_datetime_truncates_nanoseconds() {
        let at = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap() + Duration::nanoseconds(1_999);
        let ts = EventTimestamp::from_datetime(at);
        assert_eq!(ts.to_storage_string(), "2020-01-01 00:00:00.000001");
    }

    #[test]
    fn elapsed_until_counts_minutes() {
        let ts = EventTimestamp::from_datetime(fixed());
        let later = fixed() + Duration::minutes(5);
        assert_eq!(ts.elapsed_until(later).whole_minutes(), 5);
    }
}

//! # Timestamp Value Object
//!
//! UTC point in time used for quote and reservation expirations.
//!
//! # Examples
//!
//! ```
//! use dealer_reservation::domain::value_objects::timestamp::Timestamp;
//!
//! let now = Timestamp::now();
//! let later = now.add_secs(60);
//!
//! assert!(later.is_after(&now));
//! ```

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A UTC timestamp.
///
/// Wraps `chrono::DateTime<Utc>`. Deserializes from RFC 3339 strings with
/// any offset, normalizing to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from Unix seconds.
    ///
    /// Returns `None` if the value is out of range.
    #[must_use]
    pub fn from_secs(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }

    /// Returns the Unix timestamp in seconds.
    #[inline]
    #[must_use]
    pub fn timestamp_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Adds seconds to the timestamp (can be negative).
    ///
    /// # Examples
    ///
    /// ```
    /// use dealer_reservation::domain::value_objects::timestamp::Timestamp;
    ///
    /// let ts = Timestamp::from_secs(1000).unwrap();
    /// assert_eq!(ts.add_secs(60).timestamp_secs(), 1060);
    /// ```
    #[must_use]
    pub fn add_secs(&self, secs: i64) -> Self {
        Self(self.0 + Duration::seconds(secs))
    }

    /// Adds hours to the timestamp.
    #[must_use]
    pub fn add_hours(&self, hours: i64) -> Self {
        Self(self.0 + Duration::hours(hours))
    }

    /// Adds days to the timestamp.
    #[must_use]
    pub fn add_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// Subtracts seconds from the timestamp.
    #[must_use]
    pub fn sub_secs(&self, secs: i64) -> Self {
        Self(self.0 - Duration::seconds(secs))
    }

    /// Returns true if this timestamp is in the past.
    ///
    /// # Examples
    ///
    /// ```
    /// use dealer_reservation::domain::value_objects::timestamp::Timestamp;
    ///
    /// assert!(Timestamp::from_secs(0).unwrap().is_expired());
    /// assert!(!Timestamp::now().add_secs(3600).is_expired());
    /// ```
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.0 < Utc::now()
    }

    /// Returns true if this timestamp is after another.
    #[inline]
    #[must_use]
    pub fn is_after(&self, other: &Self) -> bool {
        self.0 > other.0
    }

    /// Returns the time from `self` until `other`, or zero if `other` is earlier.
    #[must_use]
    pub fn duration_until(&self, other: &Self) -> std::time::Duration {
        (other.0 - self.0)
            .to_std()
            .unwrap_or(std::time::Duration::ZERO)
    }

    /// Formats the timestamp as RFC 3339.
    #[must_use]
    pub fn to_iso8601(&self) -> String {
        self.0.to_rfc3339()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod from_secs {
        use super::*;

        #[test]
        fn epoch_is_expired() {
            assert!(Timestamp::from_secs(0).unwrap().is_expired());
        }

        #[test]
        fn out_of_range_seconds_are_rejected() {
            assert!(Timestamp::from_secs(i64::MAX).is_none());
        }
    }

    mod arithmetic {
        use super::*;

        #[test]
        fn add_days_and_hours() {
            let ts = Timestamp::from_secs(0).unwrap();
            assert_eq!(ts.add_hours(48).timestamp_secs(), 48 * 3600);
            assert_eq!(ts.add_days(7).timestamp_secs(), 7 * 86_400);
        }

        #[test]
        fn duration_until_past_is_zero() {
            let now = Timestamp::now();
            let past = now.sub_secs(10);
            assert_eq!(now.duration_until(&past), std::time::Duration::ZERO);
        }

        #[test]
        fn duration_until_future() {
            let ts = Timestamp::from_secs(100).unwrap();
            let later = ts.add_secs(30);
            assert_eq!(ts.duration_until(&later).as_secs(), 30);
        }
    }

    mod serde_format {
        use super::*;

        #[test]
        fn parses_offset_and_normalizes_to_utc() {
            let ts: Timestamp = serde_json::from_str("\"2024-01-01T09:00:00-03:00\"").unwrap();
            assert_eq!(ts, Timestamp::from_secs(1704110400).unwrap());
        }

        #[test]
        fn parses_fractional_seconds() {
            let ts: Timestamp =
                serde_json::from_str("\"2024-01-01T12:00:00.123456Z\"").unwrap();
            assert_eq!(ts.timestamp_secs(), 1704110400);
        }
    }
}

//! Backend timestamps.
//!
//! The backend emits ISO-8601 date-times, sometimes without an offset
//! (naive values stored as UTC). [`Timestamp`] accepts both forms and always
//! serializes as RFC 3339.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Display format used by every admin page.
pub const DISPLAY_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// A point in time reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Wrap a UTC date-time.
    #[must_use]
    pub const fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    /// The current time.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Parse an RFC 3339 value, or a naive ISO-8601 value taken as UTC.
    ///
    /// Returns `None` when neither form matches.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(at) = DateTime::parse_from_rfc3339(s) {
            return Some(Self(at.with_timezone(&Utc)));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
            .map(|naive| Self(naive.and_utc()))
    }

    /// The underlying UTC value.
    #[must_use]
    pub const fn as_utc(&self) -> DateTime<Utc> {
        self.0
    }

    /// Format in the given display offset as `YYYY/MM/DD HH:MM:SS`.
    #[must_use]
    pub fn format_in(&self, offset: FixedOffset) -> String {
        self.0.with_timezone(&offset).format(DISPLAY_FORMAT).to_string()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(at: DateTime<Utc>) -> Self {
        Self(at)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn jst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    #[test]
    fn test_parse_rfc3339() {
        let ts = Timestamp::parse("2024-03-01T12:00:00+00:00").unwrap();
        assert_eq!(ts.as_utc(), Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_naive_is_utc() {
        let ts = Timestamp::parse("2024-03-01T12:00:00.123456").unwrap();
        assert_eq!(ts.format_in(jst()), "2024/03/01 21:00:00");
    }

    #[test]
    fn test_parse_space_separated() {
        assert!(Timestamp::parse("2024-03-01 12:00:00").is_some());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Timestamp::parse("yesterday").is_none());
    }

    #[test]
    fn test_format_crosses_date_boundary() {
        let ts = Timestamp::parse("2024-12-31T20:30:00Z").unwrap();
        assert_eq!(ts.format_in(jst()), "2025/01/01 05:30:00");
    }

    #[test]
    fn test_serde() {
        let ts: Timestamp = serde_json::from_str("\"2024-03-01T12:00:00\"").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2024-03-01T12:00:00+00:00\"");
        assert!(serde_json::from_str::<Timestamp>("\"soon\"").is_err());
    }
}

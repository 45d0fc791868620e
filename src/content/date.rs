//! Post dates

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

/// A post's publication date.
///
/// Stored in UTC; naive inputs (no offset) are taken as UTC. The canonical
/// string form is ISO 8601 with milliseconds, e.g. `2021-05-18T00:00:00.000Z`,
/// so string order and chronological order agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PostDate(DateTime<Utc>);

impl PostDate {
    /// Parse a date string in the formats authors actually write
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self(dt.with_timezone(&Utc)));
        }

        let datetime_formats = [
            "%Y-%m-%d %H:%M:%S",
            "%Y/%m/%d %H:%M:%S",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y/%m/%d %H:%M:%S%.f",
            "%Y-%m-%d %H:%M",
            "%Y/%m/%d %H:%M",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M",
        ];
        for fmt in datetime_formats {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(Self(dt.and_utc()));
            }
        }

        // YAML timestamps may put a space before the offset
        let offset_formats = [
            "%Y-%m-%dT%H:%M:%S%z",
            "%Y-%m-%dT%H:%M:%S%.f%z",
            "%Y-%m-%d %H:%M:%S%.f %z",
            "%Y-%m-%d %H:%M:%S%.f %:z",
        ];
        for fmt in offset_formats {
            if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
                return Some(Self(dt.with_timezone(&Utc)));
            }
        }

        for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
            if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
                return Some(Self(d.and_hms_opt(0, 0, 0)?.and_utc()));
            }
        }

        None
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Canonical ISO 8601 form
    pub fn to_iso_string(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl From<DateTime<Utc>> for PostDate {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl fmt::Display for PostDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso_string())
    }
}

impl Serialize for PostDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_date() {
        let date = PostDate::parse("2021-05-18").unwrap();
        assert_eq!(date.to_iso_string(), "2021-05-18T00:00:00.000Z");
    }

    #[test]
    fn test_parse_various_formats() {
        assert_eq!(
            PostDate::parse("2024/01/15 10:30:00").unwrap().to_iso_string(),
            "2024-01-15T10:30:00.000Z"
        );
        assert_eq!(
            PostDate::parse("2024-01-15T10:30:00+02:00")
                .unwrap()
                .to_iso_string(),
            "2024-01-15T08:30:00.000Z"
        );
        assert_eq!(
            PostDate::parse("2024-01-15 10:30").unwrap().to_iso_string(),
            "2024-01-15T10:30:00.000Z"
        );
        assert_eq!(
            PostDate::parse("2021-05-18 10:00:00.5").unwrap().to_iso_string(),
            "2021-05-18T10:00:00.500Z"
        );
        assert_eq!(
            PostDate::parse("2021/05/18 10:00:00.25").unwrap().to_iso_string(),
            "2021-05-18T10:00:00.250Z"
        );
        assert_eq!(
            PostDate::parse("2021-05-18 10:00:00 +02:00")
                .unwrap()
                .to_iso_string(),
            "2021-05-18T08:00:00.000Z"
        );
        assert_eq!(
            PostDate::parse("2021-05-18 10:00:00.5 +0200")
                .unwrap()
                .to_iso_string(),
            "2021-05-18T08:00:00.500Z"
        );
    }

    #[test]
    fn test_iso_round_trip() {
        for input in ["2021-05-18", "2021-06-01 08:00:00", "2020-02-29T23:59:59.250Z"] {
            let first = PostDate::parse(input).unwrap().to_iso_string();
            let second = PostDate::parse(&first).unwrap().to_iso_string();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(PostDate::parse("yesterday").is_none());
        assert!(PostDate::parse("2021-13-40").is_none());
        assert!(PostDate::parse("").is_none());
    }

    #[test]
    fn test_ordering_matches_string_order() {
        let a = PostDate::parse("2021-01-01").unwrap();
        let b = PostDate::parse("2021-05-18").unwrap();
        assert!(a < b);
        assert!(a.to_iso_string() < b.to_iso_string());
    }
}

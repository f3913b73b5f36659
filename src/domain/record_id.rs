//! Type-safe record identifier.
//!
//! [`RecordId`] wraps the positive integer primary key the persistence
//! layer assigns to every Author and Post row.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// System-assigned identifier of a persisted record.
///
/// Assigned once at insert time and immutable thereafter. Serialized as a
/// bare JSON number so the wire shape stays `{"id": 3, ...}`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// Wraps a raw primary key value.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw primary key value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Parses a path segment, accepting only positive decimal integers.
    ///
    /// Returns `None` for anything a `<int:pk>` style route would not match.
    #[must_use]
    pub fn parse_segment(segment: &str) -> Option<Self> {
        if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        segment.parse::<i64>().ok().filter(|n| *n > 0).map(Self)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

impl From<i64> for RecordId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl From<RecordId> for i64 {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn display_is_plain_integer() {
        assert_eq!(RecordId::new(42).to_string(), "42");
    }

    #[test]
    fn serializes_as_number() {
        let Ok(json) = serde_json::to_string(&RecordId::new(5)) else {
            panic!("serialization failed");
        };
        assert_eq!(json, "5");
        let Ok(back) = serde_json::from_str::<RecordId>("5") else {
            panic!("deserialization failed");
        };
        assert_eq!(back, RecordId::new(5));
    }

    #[test]
    fn parse_segment_accepts_positive_integers_only() {
        assert_eq!(RecordId::parse_segment("12"), Some(RecordId::new(12)));
        assert_eq!(RecordId::parse_segment("0"), None);
        assert_eq!(RecordId::parse_segment("-3"), None);
        assert_eq!(RecordId::parse_segment("abc"), None);
        assert_eq!(RecordId::parse_segment(""), None);
        assert_eq!(RecordId::parse_segment("99999999999999999999"), None);
    }

    #[test]
    fn ordering_follows_raw_value() {
        let mut ids = vec![RecordId::new(3), RecordId::new(1), RecordId::new(2)];
        ids.sort();
        assert_eq!(ids, vec![RecordId::new(1), RecordId::new(2), RecordId::new(3)]);
    }
}

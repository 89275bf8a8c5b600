//! Tagged field values held by a response record

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Persisted format for dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Persisted format for times of day
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// A single answer in the response record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// Free text
    Text(String),
    /// Whole number
    Integer(i64),
    /// Calendar date
    Date(NaiveDate),
    /// Time of day
    Time(NaiveTime),
    /// One label out of a fixed option list (yes/no answers included)
    Choice(String),
}

/// Kind tag of a [`FieldValue`], fixed per key for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text
    Text,
    /// Whole number
    Integer,
    /// Calendar date
    Date,
    /// Time of day
    Time,
    /// Option label
    Choice,
}

impl FieldValue {
    /// Build a text value
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Build a choice value
    pub fn choice(label: impl Into<String>) -> Self {
        Self::Choice(label.into())
    }

    /// Kind tag of this value
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Integer(_) => FieldKind::Integer,
            Self::Date(_) => FieldKind::Date,
            Self::Time(_) => FieldKind::Time,
            Self::Choice(_) => FieldKind::Choice,
        }
    }

    /// Borrow the string payload of text and choice values
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Choice(s) => Some(s),
            _ => None,
        }
    }

    /// True when the persisted form is empty or whitespace only
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.as_str().is_some_and(|s| s.trim().is_empty())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) | Self::Choice(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Self::Time(t) => write!(f, "{}", t.format(TIME_FORMAT)),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Date => "date",
            Self::Time => "time",
            Self::Choice => "choice",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temporal_values_use_fixed_formats() {
        let date = FieldValue::Date(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
        let time = FieldValue::Time(NaiveTime::from_hms_opt(9, 5, 0).unwrap());
        assert_eq!(date.to_string(), "2024-03-07");
        assert_eq!(time.to_string(), "09:05:00");
    }

    #[test]
    fn blank_only_applies_to_strings() {
        assert!(FieldValue::text("  ").is_blank());
        assert!(!FieldValue::Integer(0).is_blank());
        assert!(!FieldValue::choice("Yes").is_blank());
    }

    #[test]
    fn serde_tags_kind() {
        let json = serde_json::to_string(&FieldValue::Integer(42)).unwrap();
        assert_eq!(json, r#"{"kind":"integer","value":42}"#);
    }

    #[test]
    fn record_serde_keeps_order_and_kinds() {
        let mut record = crate::ResponseRecord::new();
        record.set("consent", FieldValue::choice("Yes")).unwrap();
        record.set("staff_count", FieldValue::Integer(4)).unwrap();
        record
            .set(
                "date",
                FieldValue::Date(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()),
            )
            .unwrap();

        let json = serde_json::to_string(&record).unwrap();
        let back: crate::ResponseRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
        let keys: Vec<&str> = back.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["consent", "staff_count", "date"]);
    }
}

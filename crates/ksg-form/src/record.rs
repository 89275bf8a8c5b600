//! The response record accumulated across all steps of a session

use crate::error::RecordError;
use crate::value::FieldValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Column holding the generated submission identifier
pub const SUBMISSION_ID_KEY: &str = "submission_id";

/// Mapping from field key to answer, in first-write order
///
/// Once a key has been written its value kind is fixed for the lifetime
/// of the record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    fields: IndexMap<String, FieldValue>,
}

impl ResponseRecord {
    /// Create an empty record
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value stored under `key`
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// String payload of a text or choice field
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_str)
    }

    /// Whether `key` has been written
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Write `value` under `key`, keeping the key's position if it exists
    pub fn set(&mut self, key: impl Into<String>, value: FieldValue) -> Result<(), RecordError> {
        let key = key.into();
        if let Some(existing) = self.fields.get(&key) {
            if existing.kind() != value.kind() {
                return Err(RecordError::KindMismatch {
                    key,
                    existing: existing.kind(),
                    attempted: value.kind(),
                });
            }
        }
        self.fields.insert(key, value);
        Ok(())
    }

    /// Drop `key`, keeping the order of the remaining keys
    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.fields.shift_remove(key)
    }

    /// Number of keys written
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when nothing has been written
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate keys and values in first-write order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Copy of the record with every value in its persisted string form
    #[must_use]
    pub fn finalized(&self) -> IndexMap<String, String> {
        self.fields
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }

    /// Rows for the review page; blank answers are left out
    #[must_use]
    pub fn review_rows(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .filter(|(_, v)| !v.trim().is_empty())
            .collect()
    }
}

impl<'a> IntoIterator for &'a ResponseRecord {
    type Item = (&'a String, &'a FieldValue);
    type IntoIter = indexmap::map::Iter<'a, String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

//! Result rows
//!
//! A [`Row`] is one result record handed over by a search: the requested
//! output columns plus reserved columns such as [`DISTANCE_COLUMN`].
//! Keys are opaque strings. A leading underscore carries no meaning here.

use crate::value::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Distance between the query and the row, written by vector search
pub const DISTANCE_COLUMN: &str = "_distance";
/// Full-text search score
pub const SCORE_COLUMN: &str = "_score";
/// Score produced by a re-ranker over hybrid results
pub const RELEVANCE_SCORE_COLUMN: &str = "_relevance_score";
/// Physical row id, when requested
pub const ROWID_COLUMN: &str = "_rowid";

/// Columns written by the search layer rather than the user
pub const RESERVED_COLUMNS: [&str; 4] = [
    DISTANCE_COLUMN,
    SCORE_COLUMN,
    RELEVANCE_SCORE_COLUMN,
    ROWID_COLUMN,
];

/// Insertion-ordered mapping from column name to value
///
/// Rows are small (a handful of columns), so lookups scan the entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    entries: Vec<(String, Value)>,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty row with room for `capacity` columns
    pub fn with_capacity(capacity: usize) -> Self {
        Row {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert a column, replacing an existing value in place.
    ///
    /// Returns the previous value if the column was present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Attach the reserved distance column
    pub fn with_distance(self, distance: f64) -> Self {
        self.with(DISTANCE_COLUMN, Value::Float(distance))
    }

    /// Look up a column by its literal name
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Check whether a column is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove a column, preserving the order of the rest
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    /// The search distance, if present and numeric
    pub fn distance(&self) -> Option<f64> {
        self.get(DISTANCE_COLUMN).and_then(Value::as_number)
    }

    /// Column names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Columns in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the row has no columns
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Convert to a JSON object, preserving column order
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Columns keep the object's key order (`serde_json` is built with `preserve_order`)
impl From<serde_json::Map<String, serde_json::Value>> for Row {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter().map(|(k, v)| (k, Value::from(v))).collect()
    }
}

impl TryFrom<serde_json::Value> for Row {
    type Error = serde_json::Value;

    /// Only JSON objects convert; anything else is handed back unchanged.
    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Object(map) => Ok(Row::from(map)),
            other => Err(other),
        }
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, &v.to_json())?;
        }
        map.end()
    }
}

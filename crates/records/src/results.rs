//! Search result sets
//!
//! [`SearchResults`] is the hand-off point from the search layer: the rows
//! it returned, in rank order, with conversions to records and serde models.

use serde::de::DeserializeOwned;
use strata_core::Row;

use crate::error::{RecordError, RecordResult};
use crate::mapper::{map_rows, map_rows_as};
use crate::record::Record;
use crate::shape::RecordShape;

/// Rows returned by one search, in rank order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    rows: Vec<Row>,
}

impl SearchResults {
    /// Wrap rows produced upstream
    pub fn new(rows: Vec<Row>) -> Self {
        SearchResults { rows }
    }

    /// Build from JSON objects, failing on the first non-object element
    pub fn from_json(values: Vec<serde_json::Value>) -> RecordResult<Self> {
        let rows = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                Row::try_from(value).map_err(|other| {
                    RecordError::Deserialize(format!(
                        "expected a JSON object, got {}",
                        json_kind(&other)
                    ))
                    .at_row(index)
                })
            })
            .collect::<RecordResult<Vec<_>>>()?;
        Ok(SearchResults { rows })
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the search returned nothing
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in rank order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Iterate rows in rank order
    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// The `_distance` column of every row, `None` where absent
    pub fn distances(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(Row::distance).collect()
    }

    /// Map every row onto `shape`
    pub fn to_records(&self, shape: &RecordShape) -> RecordResult<Vec<Record>> {
        map_rows(&self.rows, shape)
    }

    /// Map every row onto a serde model
    pub fn to_models<T: DeserializeOwned>(&self) -> RecordResult<Vec<T>> {
        map_rows_as(&self.rows)
    }

    /// Unwrap into the underlying rows
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl From<Vec<Row>> for SearchResults {
    fn from(rows: Vec<Row>) -> Self {
        SearchResults::new(rows)
    }
}

impl FromIterator<Row> for SearchResults {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        SearchResults::new(iter.into_iter().collect())
    }
}

impl IntoIterator for SearchResults {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a SearchResults {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

//! Row-to-record mapping
//!
//! Each row maps independently of every other row. All entry points return
//! one output per input row, in input order, or the error of the first
//! failing row wrapped in [`RecordError::Row`].

use std::time::Instant;

use rayon::prelude::*;
use serde::de::DeserializeOwned;
use strata_core::Row;
use tracing::debug;

use crate::error::{RecordError, RecordResult};
use crate::record::Record;
use crate::shape::RecordShape;

/// Map every row onto `shape`
pub fn map_rows(rows: &[Row], shape: &RecordShape) -> RecordResult<Vec<Record>> {
    let start = Instant::now();
    let records = rows
        .iter()
        .enumerate()
        .map(|(index, row)| shape.validate_row(row).map_err(|e| e.at_row(index)))
        .collect::<RecordResult<Vec<_>>>()?;
    debug!(target: "strata::records", shape = shape.name(), rows = records.len(), duration_us = start.elapsed().as_micros() as u64, "Rows mapped");
    Ok(records)
}

/// Same as [`map_rows`], spread over the rayon pool.
///
/// On failure the reported error is the one of the lowest failing row.
pub fn map_rows_par(rows: &[Row], shape: &RecordShape) -> RecordResult<Vec<Record>> {
    let start = Instant::now();
    let results: Vec<RecordResult<Record>> = rows
        .par_iter()
        .enumerate()
        .map(|(index, row)| shape.validate_row(row).map_err(|e| e.at_row(index)))
        .collect();
    let records = results.into_iter().collect::<RecordResult<Vec<_>>>()?;
    debug!(target: "strata::records", shape = shape.name(), rows = records.len(), duration_us = start.elapsed().as_micros() as u64, parallel = true, "Rows mapped");
    Ok(records)
}

/// Map one row onto a serde model.
///
/// The model is deserialized straight from the row's values; aliases are
/// whatever the model declares with `#[serde(rename = "...")]` or
/// `#[serde(alias = "...")]`. Bytes columns read as byte sequences.
pub fn from_row<T: DeserializeOwned>(row: &Row) -> RecordResult<T> {
    row.deserialize_into()
        .map_err(|e| RecordError::Deserialize(e.to_string()))
}

/// Map every row onto a serde model
pub fn map_rows_as<T: DeserializeOwned>(rows: &[Row]) -> RecordResult<Vec<T>> {
    let start = Instant::now();
    let models = rows
        .iter()
        .enumerate()
        .map(|(index, row)| from_row(row).map_err(|e| e.at_row(index)))
        .collect::<RecordResult<Vec<T>>>()?;
    debug!(target: "strata::records", model = std::any::type_name::<T>(), rows = models.len(), duration_us = start.elapsed().as_micros() as u64, "Rows mapped");
    Ok(models)
}

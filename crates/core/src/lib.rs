//! Core types shared by the record mapping crates
//!
//! This crate defines the data handed over by the search layer:
//! - Value: Unified value enum for row cells and record fields
//! - Row: Insertion-ordered column map for one search result
//! - Reserved column names (`_distance`, `_score`, ...)
//! - Direct serde deserialization of models from rows

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod de;
pub mod row;
pub mod value;

pub use row::{
    Row, DISTANCE_COLUMN, RELEVANCE_SCORE_COLUMN, RESERVED_COLUMNS, ROWID_COLUMN, SCORE_COLUMN,
};
pub use de::DeError;
pub use value::Value;

//! Record mapping for search results
//!
//! Turns result rows (output columns plus reserved columns such as
//! `_distance`) into instances of user-declared record shapes:
//! - RecordShape: stored fields with optional aliases, computed fields, config
//! - Record: one validated instance, computed fields evaluated on read
//! - map_rows / map_rows_par: row-to-record mapping
//! - map_rows_as: row-to-serde-model mapping
//! - SearchResults: result set wrapper handed over by the search layer
//! - RecordError: validation and construction errors

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod field;
pub mod mapper;
pub mod record;
pub mod results;
pub mod shape;

pub use config::{ExtraPolicy, ShapeConfig, CONFIG_FILE_NAME};
pub use error::{ErrorKind, RecordError, RecordResult};
pub use field::{ComputeFn, ComputedField, FieldSpec, FieldType};
pub use mapper::{from_row, map_rows, map_rows_as, map_rows_par};
pub use record::{DumpOptions, Record};
pub use results::SearchResults;
pub use shape::{RecordShape, RecordShapeBuilder};

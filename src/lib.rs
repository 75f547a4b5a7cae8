//! strata-rowmap - map vector search results onto record shapes
//!
//! A search hands back rows: the requested columns plus reserved columns such
//! as `_distance`. This crate turns those rows into typed records, either
//! dynamically declared shapes with aliases and computed fields, or plain
//! serde structs.
//!
//! # Quick Start
//!
//! ```
//! use strata_rowmap::{map_rows, FieldSpec, FieldType, RecordShape, Row, Value};
//!
//! let shape = RecordShape::builder("Item")
//!     .field(FieldSpec::new("name", FieldType::String).with_alias("item"))
//!     .field(FieldSpec::new("price", FieldType::Float))
//!     .field(FieldSpec::new("distance", FieldType::Float).with_alias("_distance"))
//!     .computed("similarity", FieldType::Float, |r| {
//!         Ok(Value::Float(1.0 - r.get_float("distance")?))
//!     })
//!     .build()?;
//!
//! let row = Row::new().with("item", "foo").with("price", 10.0).with_distance(0.25);
//! let records = map_rows(&[row], &shape)?;
//! assert_eq!(records[0].get_float("similarity")?, 0.75);
//! # Ok::<(), strata_rowmap::RecordError>(())
//! ```

pub use strata_core::*;
pub use strata_records::*;

//! Record instances
//!
//! A [`Record`] holds the validated values of its shape's stored fields.
//! Computed fields are not stored: every read runs the field's function over
//! the current stored values, so they stay consistent after [`Record::set`].

use std::fmt;

use serde::ser::{Error as _, Serialize, SerializeMap, Serializer};
use strata_core::{Row, Value};

use crate::error::{RecordError, RecordResult};
use crate::shape::RecordShape;

/// Options for [`Record::to_row`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpOptions {
    /// Key stored fields by their alias instead of their internal name
    pub by_alias: bool,
    /// Evaluate and include computed fields
    pub include_computed: bool,
}

impl Default for DumpOptions {
    fn default() -> Self {
        DumpOptions {
            by_alias: false,
            include_computed: true,
        }
    }
}

/// One instance of a [`RecordShape`]
#[derive(Clone)]
pub struct Record {
    shape: RecordShape,
    values: Vec<Value>,
}

impl Record {
    pub(crate) fn new(shape: RecordShape, values: Vec<Value>) -> Self {
        debug_assert_eq!(shape.fields().len(), values.len());
        Record { shape, values }
    }

    /// The shape this record conforms to
    pub fn shape(&self) -> &RecordShape {
        &self.shape
    }

    fn unknown(&self, name: &str) -> RecordError {
        RecordError::UnknownField {
            shape: self.shape.name().to_string(),
            field: name.to_string(),
        }
    }

    /// Stored value of a field, by internal name
    pub fn stored(&self, name: &str) -> Option<&Value> {
        self.shape.field_index(name).map(|i| &self.values[i])
    }

    /// Read a stored or computed field by internal name
    pub fn get(&self, name: &str) -> RecordResult<Value> {
        if let Some(value) = self.stored(name) {
            return Ok(value.clone());
        }
        match self.shape.computed(name) {
            Some(computed) => computed.evaluate(self),
            None => Err(self.unknown(name)),
        }
    }

    fn mismatch(name: &str, expected: &str, actual: &Value) -> RecordError {
        RecordError::TypeMismatch {
            field: name.to_string(),
            expected: expected.to_string(),
            actual: actual.type_name().to_string(),
        }
    }

    /// Read a numeric field as f64
    pub fn get_float(&self, name: &str) -> RecordResult<f64> {
        let value = self.get(name)?;
        value
            .as_number()
            .ok_or_else(|| Self::mismatch(name, "Float", &value))
    }

    /// Read an integer field
    pub fn get_int(&self, name: &str) -> RecordResult<i64> {
        let value = self.get(name)?;
        value
            .as_int()
            .ok_or_else(|| Self::mismatch(name, "Int", &value))
    }

    /// Read a boolean field
    pub fn get_bool(&self, name: &str) -> RecordResult<bool> {
        let value = self.get(name)?;
        value
            .as_bool()
            .ok_or_else(|| Self::mismatch(name, "Bool", &value))
    }

    /// Read a string field
    pub fn get_str(&self, name: &str) -> RecordResult<String> {
        match self.get(name)? {
            Value::String(s) => Ok(s),
            other => Err(Self::mismatch(name, "String", &other)),
        }
    }

    /// Assign a stored field, validating against its declared type.
    ///
    /// Computed fields cannot be assigned.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> RecordResult<()> {
        let Some(index) = self.shape.field_index(name) else {
            if self.shape.computed(name).is_some() {
                return Err(RecordError::ComputedFieldSupplied {
                    field: name.to_string(),
                });
            }
            return Err(self.unknown(name));
        };
        let strict = self.shape.config().strict;
        self.values[index] = self.shape.fields()[index].check(value.into(), strict)?;
        Ok(())
    }

    /// Stored fields as (internal name, value) pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.shape
            .fields()
            .iter()
            .map(|f| f.name())
            .zip(self.values.iter())
    }

    /// Dump to a row, stored fields first, then computed fields.
    pub fn to_row(&self, options: DumpOptions) -> RecordResult<Row> {
        let mut row = Row::with_capacity(self.values.len() + self.shape.computed_fields().len());
        for (spec, value) in self.shape.fields().iter().zip(&self.values) {
            let key = if options.by_alias {
                spec.input_key()
            } else {
                spec.name()
            };
            row.insert(key, value.clone());
        }
        if options.include_computed {
            for computed in self.shape.computed_fields() {
                row.insert(computed.name(), computed.evaluate(self)?);
            }
        }
        Ok(row)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.shape.same_as(&other.shape) && self.values == other.values
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.shape.name());
        for (name, value) in self.iter() {
            s.field(name, value);
        }
        s.finish()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let row = self
            .to_row(DumpOptions::default())
            .map_err(|e| S::Error::custom(e.to_string()))?;
        let mut map = serializer.serialize_map(Some(row.len()))?;
        for (k, v) in row.iter() {
            map.serialize_entry(k, &v.to_json())?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldSpec, FieldType};

    fn shape() -> RecordShape {
        RecordShape::builder("ItemWithAliases")
            .field(FieldSpec::new("name", FieldType::String).with_alias("item"))
            .field(FieldSpec::new("price", FieldType::Float))
            .field(FieldSpec::new("distance", FieldType::Float).with_alias("_distance"))
            .computed("similarity", FieldType::Float, |r| {
                Ok(Value::Float(1.0 - r.get_float("distance")?))
            })
            .build()
            .unwrap()
    }

    fn record() -> Record {
        shape()
            .construct([
                ("item", Value::from("foo")),
                ("price", Value::Float(10.0)),
                ("_distance", Value::Float(0.1)),
            ])
            .unwrap()
    }

    #[test]
    fn test_get_stored_and_computed() {
        let r = record();
        assert_eq!(r.get("name").unwrap(), Value::from("foo"));
        assert_eq!(r.get_float("price").unwrap(), 10.0);
        assert!((r.get_float("similarity").unwrap() - 0.9).abs() < 1e-12);
        assert!(r.stored("similarity").is_none());
    }

    #[test]
    fn test_get_unknown_field() {
        let err = record().get("item").unwrap_err();
        assert!(matches!(err, RecordError::UnknownField { ref field, .. } if field == "item"));
    }

    #[test]
    fn test_typed_getter_mismatch() {
        let err = record().get_int("name").unwrap_err();
        assert!(matches!(err, RecordError::TypeMismatch { ref actual, .. } if actual == "String"));
    }

    #[test]
    fn test_set_updates_computed() {
        let mut r = record();
        r.set("distance", 1.5).unwrap();
        assert_eq!(r.get_float("similarity").unwrap(), -0.5);
    }

    #[test]
    fn test_set_validates_type() {
        let mut r = record();
        let err = r.set("price", "free").unwrap_err();
        assert!(err.is_validation_error());
        assert_eq!(r.get_float("price").unwrap(), 10.0);

        r.set("price", 12i64).unwrap();
        assert_eq!(r.stored("price"), Some(&Value::Float(12.0)));
    }

    #[test]
    fn test_set_computed_is_construction_error() {
        let mut r = record();
        assert!(r.set("similarity", 0.5).unwrap_err().is_construction_error());
        assert!(matches!(
            r.set("nope", 1i64).unwrap_err(),
            RecordError::UnknownField { .. }
        ));
    }

    #[test]
    fn test_to_row_by_name_and_alias() {
        let r = record();
        let by_name = r.to_row(DumpOptions::default()).unwrap();
        assert_eq!(
            by_name.keys().collect::<Vec<_>>(),
            vec!["name", "price", "distance", "similarity"]
        );

        let by_alias = r
            .to_row(DumpOptions {
                by_alias: true,
                include_computed: false,
            })
            .unwrap();
        assert_eq!(
            by_alias.keys().collect::<Vec<_>>(),
            vec!["item", "price", "_distance"]
        );
        // A by-alias dump feeds straight back into the shape
        assert_eq!(r.shape().validate_row(&by_alias).unwrap(), r);
    }

    #[test]
    fn test_serialize_includes_computed() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["name"], serde_json::json!("foo"));
        assert_eq!(json["distance"], serde_json::json!(0.1));
        assert!((json["similarity"].as_f64().unwrap() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_equality_requires_same_shape() {
        let a = record();
        let b = record();
        // Each `record()` builds its own `ItemWithAliases` declaration
        assert_ne!(a, b);

        let shape = shape();
        let args = [
            ("item", Value::from("foo")),
            ("price", Value::Float(10.0)),
            ("_distance", Value::Float(0.1)),
        ];
        let c = shape.construct(args.clone()).unwrap();
        let d = shape.construct(args).unwrap();
        assert_eq!(c, d);
        assert_eq!(c.clone(), c);
    }

    #[test]
    fn test_debug_uses_shape_name() {
        let text = format!("{:?}", record());
        assert!(text.starts_with("ItemWithAliases"));
        assert!(text.contains("name"));
    }
}

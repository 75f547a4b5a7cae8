//! Field declarations
//!
//! A record shape is made of stored fields ([`FieldSpec`]) that are filled
//! from input rows, and computed fields ([`ComputedField`]) that are derived
//! from the stored ones whenever they are read.

use std::fmt;
use std::sync::Arc;

use strata_core::Value;

use crate::error::{RecordError, RecordResult};
use crate::record::Record;

/// Declared type of a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// Boolean
    Bool,
    /// 64-bit integer
    Int,
    /// 64-bit float
    Float,
    /// UTF-8 string
    String,
    /// Raw bytes
    Bytes,
    /// Dense f32 embedding, optionally of a fixed dimension
    Vector {
        /// Required dimension, if any
        dim: Option<usize>,
    },
    /// Homogeneous list
    List(Box<FieldType>),
    /// String-keyed object
    Object,
    /// Any value, unchecked
    Any,
    /// Null or the inner type
    Optional(Box<FieldType>),
}

impl FieldType {
    /// Vector of a fixed dimension
    pub fn vector(dim: usize) -> Self {
        FieldType::Vector { dim: Some(dim) }
    }

    /// List of `inner`
    pub fn list(inner: FieldType) -> Self {
        FieldType::List(Box::new(inner))
    }

    /// Nullable `inner`
    pub fn optional(inner: FieldType) -> Self {
        FieldType::Optional(Box::new(inner))
    }

    /// Check `value` against this type and return what should be stored.
    ///
    /// Lax mode widens `Int` to `Float`, narrows integral `Float` to `Int`
    /// and turns numeric arrays into vectors when every element is finite
    /// as an f32. Strict mode only accepts the
    /// exact variant. On failure the description of the offending value is
    /// returned.
    pub fn validate(&self, value: Value, strict: bool) -> Result<Value, String> {
        match (self, value) {
            (FieldType::Any, v) => Ok(v),
            (FieldType::Optional(_), Value::Null) => Ok(Value::Null),
            (FieldType::Optional(inner), v) => inner.validate(v, strict),
            (FieldType::Bool, v @ Value::Bool(_)) => Ok(v),
            (FieldType::Int, v @ Value::Int(_)) => Ok(v),
            (FieldType::Int, Value::Float(f)) if !strict && is_integral(f) => {
                Ok(Value::Int(f as i64))
            }
            (FieldType::Float, v @ Value::Float(_)) => Ok(v),
            (FieldType::Float, Value::Int(i)) if !strict => Ok(Value::Float(i as f64)),
            (FieldType::String, v @ Value::String(_)) => Ok(v),
            (FieldType::Bytes, v @ Value::Bytes(_)) => Ok(v),
            (FieldType::Vector { dim }, Value::Vector(v)) => check_dim(*dim, v),
            (FieldType::Vector { dim }, Value::Array(items)) if !strict => {
                let mut v = Vec::with_capacity(items.len());
                for item in &items {
                    match item.as_number().map(|x| x as f32) {
                        Some(x) if x.is_finite() => v.push(x),
                        _ => {
                            return Err(format!("Array containing {}", item.type_name()));
                        }
                    }
                }
                check_dim(*dim, v)
            }
            (FieldType::List(inner), Value::Array(items)) => items
                .into_iter()
                .map(|item| inner.validate(item, strict))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            (FieldType::Object, v @ Value::Object(_)) => Ok(v),
            (_, v) => Err(v.type_name().to_string()),
        }
    }
}

fn is_integral(f: f64) -> bool {
    f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64
}

fn check_dim(dim: Option<usize>, v: Vec<f32>) -> Result<Value, String> {
    match dim {
        Some(d) if d != v.len() => Err(format!("Vector of dimension {}", v.len())),
        _ => Ok(Value::Vector(v)),
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Bool => write!(f, "Bool"),
            FieldType::Int => write!(f, "Int"),
            FieldType::Float => write!(f, "Float"),
            FieldType::String => write!(f, "String"),
            FieldType::Bytes => write!(f, "Bytes"),
            FieldType::Vector { dim: None } => write!(f, "Vector"),
            FieldType::Vector { dim: Some(d) } => write!(f, "Vector[{}]", d),
            FieldType::List(inner) => write!(f, "List[{}]", inner),
            FieldType::Object => write!(f, "Object"),
            FieldType::Any => write!(f, "Any"),
            FieldType::Optional(inner) => write!(f, "Optional[{}]", inner),
        }
    }
}

/// A stored field: filled from input by its alias or its own name
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    name: String,
    ty: FieldType,
    alias: Option<String>,
    default: Option<Value>,
}

impl FieldSpec {
    /// Declare a required field
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        FieldSpec {
            name: name.into(),
            ty,
            alias: None,
            default: None,
        }
    }

    /// Read this field from `alias` instead of its own name.
    ///
    /// The alias is an opaque key; `_distance` is as valid as `item`.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Make the field optional in the input, falling back to `default`
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Internal field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type
    pub fn ty(&self) -> &FieldType {
        &self.ty
    }

    /// External alias, if declared
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Default value, if declared
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Key expected in incoming rows
    pub fn input_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Whether the input must provide this field
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    /// Validate `value` for this field
    pub(crate) fn check(&self, value: Value, strict: bool) -> RecordResult<Value> {
        self.ty
            .validate(value, strict)
            .map_err(|actual| RecordError::TypeMismatch {
                field: self.name.clone(),
                expected: self.ty.to_string(),
                actual,
            })
    }
}

/// Signature of a computed field
pub type ComputeFn = dyn Fn(&Record) -> RecordResult<Value> + Send + Sync;

/// A derived field, evaluated from the stored fields on every read
#[derive(Clone)]
pub struct ComputedField {
    name: String,
    ty: FieldType,
    compute: Arc<ComputeFn>,
}

impl ComputedField {
    /// Declare a computed field
    pub fn new<F>(name: impl Into<String>, ty: FieldType, compute: F) -> Self
    where
        F: Fn(&Record) -> RecordResult<Value> + Send + Sync + 'static,
    {
        ComputedField {
            name: name.into(),
            ty,
            compute: Arc::new(compute),
        }
    }

    /// Field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared result type
    pub fn ty(&self) -> &FieldType {
        &self.ty
    }

    /// Run the computation against `record` and check the result type
    pub fn evaluate(&self, record: &Record) -> RecordResult<Value> {
        let value = (self.compute)(record)?;
        self.ty
            .validate(value, false)
            .map_err(|actual| RecordError::TypeMismatch {
                field: self.name.clone(),
                expected: self.ty.to_string(),
                actual,
            })
    }
}

impl fmt::Debug for ComputedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputedField")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_matches() {
        assert_eq!(FieldType::Bool.validate(Value::Bool(true), true), Ok(Value::Bool(true)));
        assert_eq!(FieldType::Int.validate(Value::Int(7), true), Ok(Value::Int(7)));
        assert_eq!(FieldType::Float.validate(Value::Float(0.1), true), Ok(Value::Float(0.1)));
        assert_eq!(
            FieldType::String.validate(Value::from("foo"), true),
            Ok(Value::from("foo"))
        );
    }

    #[test]
    fn test_lax_numeric_coercion() {
        assert_eq!(FieldType::Float.validate(Value::Int(10), false), Ok(Value::Float(10.0)));
        assert_eq!(FieldType::Int.validate(Value::Float(3.0), false), Ok(Value::Int(3)));
        assert_eq!(
            FieldType::Int.validate(Value::Float(3.5), false),
            Err("Float".to_string())
        );
        assert_eq!(
            FieldType::Int.validate(Value::Float(f64::NAN), false),
            Err("Float".to_string())
        );
    }

    #[test]
    fn test_strict_rejects_coercion() {
        assert_eq!(FieldType::Float.validate(Value::Int(10), true), Err("Int".to_string()));
        assert_eq!(FieldType::Int.validate(Value::Float(3.0), true), Err("Float".to_string()));
    }

    #[test]
    fn test_no_string_to_number() {
        assert_eq!(
            FieldType::Float.validate(Value::from("10.0"), false),
            Err("String".to_string())
        );
    }

    #[test]
    fn test_vector_from_numeric_array() {
        let arr = Value::Array(vec![Value::Float(3.1), Value::Int(4)]);
        assert_eq!(
            FieldType::vector(2).validate(arr.clone(), false),
            Ok(Value::Vector(vec![3.1, 4.0]))
        );
        assert_eq!(FieldType::vector(2).validate(arr, true), Err("Array".to_string()));
    }

    #[test]
    fn test_vector_dimension_checked() {
        assert_eq!(
            FieldType::vector(3).validate(Value::Vector(vec![1.0, 2.0]), false),
            Err("Vector of dimension 2".to_string())
        );
        assert!(FieldType::Vector { dim: None }
            .validate(Value::Vector(vec![1.0; 5]), true)
            .is_ok());
    }

    #[test]
    fn test_vector_rejects_non_numeric_array() {
        let arr = Value::Array(vec![Value::Float(1.0), Value::from("x")]);
        assert_eq!(
            FieldType::Vector { dim: None }.validate(arr, false),
            Err("Array containing String".to_string())
        );
    }

    #[test]
    fn test_vector_rejects_elements_outside_f32_range() {
        let ty = FieldType::Vector { dim: None };
        let too_big = Value::Array(vec![Value::Float(1.0), Value::Float(1.0e300)]);
        assert_eq!(ty.validate(too_big, false), Err("Array containing Float".to_string()));

        let nan = Value::Array(vec![Value::Float(f64::NAN)]);
        assert_eq!(ty.validate(nan, false), Err("Array containing Float".to_string()));

        let edge = Value::Array(vec![Value::Float(f32::MAX as f64)]);
        assert_eq!(ty.validate(edge, false), Ok(Value::Vector(vec![f32::MAX])));
    }

    #[test]
    fn test_list_validates_elements() {
        let ty = FieldType::list(FieldType::Float);
        assert_eq!(
            ty.validate(Value::Array(vec![Value::Int(1), Value::Float(2.0)]), false),
            Ok(Value::Array(vec![Value::Float(1.0), Value::Float(2.0)]))
        );
        assert!(ty.validate(Value::Array(vec![Value::from("a")]), false).is_err());
    }

    #[test]
    fn test_optional_accepts_null() {
        let ty = FieldType::optional(FieldType::String);
        assert_eq!(ty.validate(Value::Null, true), Ok(Value::Null));
        assert!(ty.validate(Value::from("x"), true).is_ok());
        assert!(ty.validate(Value::Int(1), true).is_err());
        assert!(FieldType::String.validate(Value::Null, false).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldType::vector(2).to_string(), "Vector[2]");
        assert_eq!(
            FieldType::optional(FieldType::list(FieldType::Int)).to_string(),
            "Optional[List[Int]]"
        );
    }

    #[test]
    fn test_field_spec_input_key() {
        let plain = FieldSpec::new("price", FieldType::Float);
        assert_eq!(plain.input_key(), "price");
        assert!(plain.alias().is_none());
        assert!(plain.is_required());

        let aliased = FieldSpec::new("distance", FieldType::Float).with_alias("_distance");
        assert_eq!(aliased.input_key(), "_distance");
        assert_eq!(aliased.name(), "distance");

        let defaulted = FieldSpec::new("tag", FieldType::String).with_default("none");
        assert!(!defaulted.is_required());
        assert_eq!(defaulted.default_value(), Some(&Value::from("none")));
    }

    #[test]
    fn test_field_spec_check_reports_field() {
        let spec = FieldSpec::new("price", FieldType::Float);
        let err = spec.check(Value::from("cheap"), false).unwrap_err();
        assert!(matches!(
            err,
            RecordError::TypeMismatch { ref field, ref expected, ref actual }
                if field == "price" && expected == "Float" && actual == "String"
        ));
    }
}

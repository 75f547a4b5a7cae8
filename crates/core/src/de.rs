//! Direct serde deserialization from values and rows
//!
//! Models are read straight from [`Value`]s without a JSON detour, so bytes
//! stay bytes and non-finite floats stay floats.

use serde::de::value::{MapDeserializer, SeqDeserializer};
use serde::de::{DeserializeOwned, Deserializer, IntoDeserializer, Visitor};
use serde::forward_to_deserialize_any;

use crate::row::Row;
use crate::value::Value;

/// Error produced while deserializing a model from a row
pub type DeError = serde::de::value::Error;

impl<'de> IntoDeserializer<'de, DeError> for Value {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

impl<'de> Deserializer<'de> for Value {
    type Error = DeError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        match self {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Int(i) => visitor.visit_i64(i),
            Value::Float(f) => visitor.visit_f64(f),
            Value::String(s) => visitor.visit_string(s),
            // Byte sequence, so `Vec<u8>` fields accept it
            Value::Bytes(b) => SeqDeserializer::new(b.into_iter()).deserialize_any(visitor),
            Value::Vector(v) => SeqDeserializer::new(v.into_iter()).deserialize_any(visitor),
            Value::Array(a) => SeqDeserializer::new(a.into_iter()).deserialize_any(visitor),
            Value::Object(o) => MapDeserializer::new(o.into_iter()).deserialize_any(visitor),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        match self {
            Value::Null => visitor.visit_none(),
            other => visitor.visit_some(other),
        }
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        match self {
            Value::Bytes(b) => visitor.visit_byte_buf(b),
            other => other.deserialize_any(visitor),
        }
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DeError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DeError> {
        match self {
            // Unit variants only
            Value::String(s) => visitor.visit_enum(s.into_deserializer()),
            other => other.deserialize_any(visitor),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        unit unit_struct seq tuple tuple_struct map struct identifier ignored_any
    }
}

impl Row {
    /// Deserialize a model from the row's columns
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T, DeError> {
        T::deserialize(MapDeserializer::new(
            self.iter().map(|(k, v)| (k.to_string(), v.clone())),
        ))
    }
}

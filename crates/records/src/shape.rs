//! Record shape declarations
//!
//! A [`RecordShape`] describes the target of a mapping: stored fields with
//! optional aliases, computed fields, and the [`ShapeConfig`] that governs
//! input handling. Shapes are immutable once built and cheap to clone, so a
//! single shape can be shared by every record it produces and across threads.
//!
//! ## Key resolution
//!
//! A stored field is read from its alias when one is declared, otherwise from
//! its own name. Aliases are opaque keys: `_distance` resolves exactly like
//! `item` does. With `populate_by_name` an aliased field falls back to its
//! internal name when the alias key is absent.

use std::collections::HashSet;
use std::sync::Arc;

use strata_core::{Row, Value};
use tracing::trace;

use crate::config::{ExtraPolicy, ShapeConfig};
use crate::error::{RecordError, RecordResult};
use crate::field::{ComputedField, FieldSpec, FieldType};
use crate::record::Record;

#[derive(Debug)]
struct ShapeInner {
    name: String,
    fields: Vec<FieldSpec>,
    computed: Vec<ComputedField>,
    config: ShapeConfig,
}

/// Immutable declaration of a record type
#[derive(Debug, Clone)]
pub struct RecordShape {
    inner: Arc<ShapeInner>,
}

impl RecordShape {
    /// Start declaring a shape
    pub fn builder(name: impl Into<String>) -> RecordShapeBuilder {
        RecordShapeBuilder {
            name: name.into(),
            fields: Vec::new(),
            computed: Vec::new(),
            config: ShapeConfig::default(),
        }
    }

    /// Shape name
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Stored fields in declaration order
    pub fn fields(&self) -> &[FieldSpec] {
        &self.inner.fields
    }

    /// Computed fields in declaration order
    pub fn computed_fields(&self) -> &[ComputedField] {
        &self.inner.computed
    }

    /// Input handling config
    pub fn config(&self) -> &ShapeConfig {
        &self.inner.config
    }

    /// Look up a stored field by internal name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.inner.fields.iter().find(|f| f.name() == name)
    }

    /// Look up a computed field by name
    pub fn computed(&self, name: &str) -> Option<&ComputedField> {
        self.inner.computed.iter().find(|c| c.name() == name)
    }

    pub(crate) fn field_index(&self, name: &str) -> Option<usize> {
        self.inner.fields.iter().position(|f| f.name() == name)
    }

    /// Whether `key` populates some stored field
    pub fn accepts_key(&self, key: &str) -> bool {
        let by_name = self.inner.config.populate_by_name;
        self.inner
            .fields
            .iter()
            .any(|f| f.input_key() == key || (by_name && f.name() == key))
    }

    /// Check whether two handles refer to the same declaration
    pub fn same_as(&self, other: &RecordShape) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn resolve<'r>(&self, spec: &FieldSpec, row: &'r Row) -> Option<&'r Value> {
        row.get(spec.input_key()).or_else(|| {
            if self.inner.config.populate_by_name && spec.alias().is_some() {
                row.get(spec.name())
            } else {
                None
            }
        })
    }

    /// Build one record from a result row.
    ///
    /// Keys the shape does not accept, computed field names included, are
    /// handled by the `extra` policy.
    pub fn validate_row(&self, row: &Row) -> RecordResult<Record> {
        let strict = self.inner.config.strict;
        let mut values = Vec::with_capacity(self.inner.fields.len());
        for spec in &self.inner.fields {
            let value = match self.resolve(spec, row) {
                Some(v) => spec.check(v.clone(), strict)?,
                None => match spec.default_value() {
                    Some(default) => default.clone(),
                    None => {
                        return Err(RecordError::MissingField {
                            field: spec.name().to_string(),
                            key: spec.input_key().to_string(),
                        })
                    }
                },
            };
            values.push(value);
        }

        for key in row.keys().filter(|k| !self.accepts_key(k)) {
            match self.inner.config.extra {
                ExtraPolicy::Forbid => {
                    return Err(RecordError::ExtraField {
                        shape: self.inner.name.clone(),
                        key: key.to_string(),
                    })
                }
                ExtraPolicy::Ignore => {
                    trace!(target: "strata::records", shape = %self.inner.name, key, "Ignoring extra key")
                }
            }
        }

        Ok(Record::new(self.clone(), values))
    }

    /// Build one record from alias-keyed arguments.
    ///
    /// Equivalent to [`validate_row`](Self::validate_row) on the same pairs,
    /// except that naming a computed field is a construction error and a
    /// repeated key is a validation error.
    pub fn construct<I, K, V>(&self, args: I) -> RecordResult<Record>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut row = Row::new();
        for (key, value) in args {
            let key = key.into();
            if self.computed(&key).is_some() {
                return Err(RecordError::ComputedFieldSupplied { field: key });
            }
            if row.contains_key(&key) {
                return Err(RecordError::DuplicateKey { key });
            }
            row.insert(key, value);
        }
        self.validate_row(&row)
    }
}

/// Builder for [`RecordShape`]
#[derive(Debug)]
pub struct RecordShapeBuilder {
    name: String,
    fields: Vec<FieldSpec>,
    computed: Vec<ComputedField>,
    config: ShapeConfig,
}

impl RecordShapeBuilder {
    /// Add a stored field
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Add a computed field
    pub fn computed<F>(mut self, name: impl Into<String>, ty: FieldType, compute: F) -> Self
    where
        F: Fn(&Record) -> RecordResult<Value> + Send + Sync + 'static,
    {
        self.computed.push(ComputedField::new(name, ty, compute));
        self
    }

    /// Replace the input handling config
    pub fn config(mut self, config: ShapeConfig) -> Self {
        self.config = config;
        self
    }

    fn invalid(&self, reason: String) -> RecordError {
        RecordError::InvalidShape {
            shape: self.name.clone(),
            reason,
        }
    }

    /// Validate the declaration and freeze it
    pub fn build(self) -> RecordResult<RecordShape> {
        if self.name.is_empty() {
            return Err(self.invalid("shape name is empty".to_string()));
        }

        let mut names = HashSet::new();
        let mut keys = HashSet::new();
        for spec in &self.fields {
            if spec.name().is_empty() {
                return Err(self.invalid("field name is empty".to_string()));
            }
            if spec.alias() == Some("") {
                return Err(self.invalid(format!("field '{}' has an empty alias", spec.name())));
            }
            if !names.insert(spec.name()) {
                return Err(self.invalid(format!("duplicate field '{}'", spec.name())));
            }
            if !keys.insert(spec.input_key()) {
                return Err(self.invalid(format!("duplicate input key '{}'", spec.input_key())));
            }
        }
        if self.config.populate_by_name {
            for spec in self.fields.iter().filter(|f| f.alias().is_some_and(|a| a != f.name())) {
                if !keys.insert(spec.name()) {
                    return Err(self.invalid(format!(
                        "field name '{}' collides with another field's alias",
                        spec.name()
                    )));
                }
            }
        }
        for computed in &self.computed {
            if computed.name().is_empty() {
                return Err(self.invalid("computed field name is empty".to_string()));
            }
            if !names.insert(computed.name()) {
                return Err(self.invalid(format!("duplicate field '{}'", computed.name())));
            }
            if keys.contains(computed.name()) {
                return Err(self.invalid(format!(
                    "computed field '{}' collides with an input key",
                    computed.name()
                )));
            }
        }

        Ok(RecordShape {
            inner: Arc::new(ShapeInner {
                name: self.name,
                fields: self.fields,
                computed: self.computed,
                config: self.config,
            }),
        })
    }
}

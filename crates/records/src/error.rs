//! Error types for record mapping

use thiserror::Error;

/// Errors raised while declaring shapes, building records, or reading them
#[derive(Debug, Error)]
pub enum RecordError {
    /// A required field had no entry in the input
    #[error("Validation error: field '{field}' is missing (expected key '{key}')")]
    MissingField {
        /// Internal field name
        field: String,
        /// Key looked up in the input
        key: String,
    },

    /// A value does not satisfy the declared field type
    #[error("Validation error: field '{field}' expected {expected}, got {actual}")]
    TypeMismatch {
        /// Internal field name
        field: String,
        /// Declared type
        expected: String,
        /// What was received
        actual: String,
    },

    /// The input carries a key the shape does not accept
    #[error("Validation error: extra key '{key}' not permitted by '{shape}'")]
    ExtraField {
        /// Shape name
        shape: String,
        /// Offending input key
        key: String,
    },

    /// The same key was supplied twice as constructor input
    #[error("Validation error: key '{key}' supplied more than once")]
    DuplicateKey {
        /// Repeated input key
        key: String,
    },

    /// A serde model could not be deserialized from a row
    #[error("Validation error: {0}")]
    Deserialize(String),

    /// A computed field was passed as constructor input or assigned
    #[error("Construction error: computed field '{field}' cannot be supplied")]
    ComputedFieldSupplied {
        /// Computed field name
        field: String,
    },

    /// Read or assignment of a field the shape does not declare
    #[error("Unknown field '{field}' on '{shape}'")]
    UnknownField {
        /// Shape name
        shape: String,
        /// Requested field
        field: String,
    },

    /// The shape declaration is inconsistent
    #[error("Invalid record shape '{shape}': {reason}")]
    InvalidShape {
        /// Shape name
        shape: String,
        /// What is wrong
        reason: String,
    },

    /// Configuration could not be read or parsed
    #[error("Config error: {0}")]
    Config(String),

    /// A row failed while mapping a batch
    #[error("row {index}: {source}")]
    Row {
        /// Position of the row in the input
        index: usize,
        /// Underlying failure
        #[source]
        source: Box<RecordError>,
    },
}

/// Broad classification of a [`RecordError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input data did not satisfy the shape
    Validation,
    /// Caller misused the constructor
    Construction,
    /// Shape declaration problem
    Shape,
    /// Access to an undeclared field
    Access,
    /// Configuration problem
    Config,
}

impl RecordError {
    /// Wrap an error with the index of the row that produced it
    pub fn at_row(self, index: usize) -> Self {
        RecordError::Row {
            index,
            source: Box::new(self),
        }
    }

    /// Classify the error, looking through the row wrapper
    pub fn kind(&self) -> ErrorKind {
        match self {
            RecordError::MissingField { .. }
            | RecordError::TypeMismatch { .. }
            | RecordError::ExtraField { .. }
            | RecordError::DuplicateKey { .. }
            | RecordError::Deserialize(_) => ErrorKind::Validation,
            RecordError::ComputedFieldSupplied { .. } => ErrorKind::Construction,
            RecordError::UnknownField { .. } => ErrorKind::Access,
            RecordError::InvalidShape { .. } => ErrorKind::Shape,
            RecordError::Config(_) => ErrorKind::Config,
            RecordError::Row { source, .. } => source.kind(),
        }
    }

    /// Check if this error is a validation error
    pub fn is_validation_error(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    /// Check if this error is a construction-misuse error
    pub fn is_construction_error(&self) -> bool {
        self.kind() == ErrorKind::Construction
    }

    /// Index of the failing row, when raised by a batch mapping
    pub fn row_index(&self) -> Option<usize> {
        match self {
            RecordError::Row { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// Result type alias for record operations
pub type RecordResult<T> = Result<T, RecordError>;

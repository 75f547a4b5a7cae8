//! Shape configuration via `records.toml`
//!
//! Controls how strictly a record shape treats its input. Every shape carries
//! a [`ShapeConfig`]; the defaults match the common case of mapping search
//! results that contain more columns than the shape declares.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

use crate::error::{RecordError, RecordResult};

/// Config file name conventionally placed next to the application data.
pub const CONFIG_FILE_NAME: &str = "records.toml";

/// What to do with input keys the shape does not accept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtraPolicy {
    /// Drop them silently
    #[default]
    Ignore,
    /// Fail with a validation error
    Forbid,
}

/// Input handling for a record shape.
///
/// # Example
///
/// ```toml
/// # "ignore" (default) or "forbid"
/// extra = "ignore"
/// populate_by_name = false
/// strict = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShapeConfig {
    /// Handling of undeclared input keys
    #[serde(default)]
    pub extra: ExtraPolicy,
    /// Let aliased fields also be populated by their internal name
    #[serde(default)]
    pub populate_by_name: bool,
    /// Disable numeric and vector coercions
    #[serde(default)]
    pub strict: bool,
}

impl ShapeConfig {
    /// Config that rejects undeclared keys
    pub fn forbid_extra() -> Self {
        ShapeConfig {
            extra: ExtraPolicy::Forbid,
            ..Self::default()
        }
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Record shape configuration
#
# Undeclared input keys: "ignore" (default) or "forbid"
extra = "ignore"

# Accept a field's own name when its alias is absent (default: false)
populate_by_name = false

# Exact types only: no Int -> Float widening, no array -> vector (default: false)
strict = false
"#
    }

    /// Parse config from TOML text.
    pub fn from_toml_str(content: &str) -> RecordResult<Self> {
        toml::from_str(content)
            .map_err(|e| RecordError::Config(format!("Failed to parse shape config: {}", e)))
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> RecordResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RecordError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| {
            warn!(target: "strata::records", path = %path.display(), error = %e, "Invalid shape config");
            RecordError::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> RecordResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| RecordError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            RecordError::Config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

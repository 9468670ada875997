//! Configuration for property bags
//!
//! A bag carries two default policies and the separator used to split
//! compound paths. Options can be built in code or loaded from a TOML file.

use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::Value;
use serde::{Deserialize, Serialize};

/// Separator used for compound paths unless configured otherwise
pub const DEFAULT_SEPARATOR: &str = ".";

/// What a missing path produces when it is used
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fallback {
    /// Raise the given error kind
    Raise(ErrorKind),
    /// Behave like this value
    Value(Value),
}

impl Fallback {
    /// Policy that raises `kind`
    pub fn raise(kind: ErrorKind) -> Self {
        Fallback::Raise(kind)
    }

    /// Policy that mimics `value`
    pub fn value(value: impl Into<Value>) -> Self {
        Fallback::Value(value.into())
    }

    /// True if this policy raises instead of producing a value
    pub fn is_raise(&self) -> bool {
        matches!(self, Fallback::Raise(_))
    }
}

impl Default for Fallback {
    fn default() -> Self {
        Fallback::Raise(ErrorKind::ValueError)
    }
}

impl From<ErrorKind> for Fallback {
    fn from(kind: ErrorKind) -> Self {
        Fallback::Raise(kind)
    }
}

impl From<Value> for Fallback {
    fn from(value: Value) -> Self {
        Fallback::Value(value)
    }
}

/// Bag configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BagOptions {
    /// Policy used when a missing path is converted to text
    pub default_string: Fallback,

    /// Policy used for every other coercion and comparison
    pub default_value: Fallback,

    /// Compound path separator
    pub separator: String,
}

impl Default for BagOptions {
    fn default() -> Self {
        Self {
            default_string: Fallback::default(),
            default_value: Fallback::default(),
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl BagOptions {
    /// Options with both policies set
    pub fn with_defaults(default_string: impl Into<Fallback>, default_value: impl Into<Fallback>) -> Self {
        Self {
            default_string: default_string.into(),
            default_value: default_value.into(),
            ..Self::default()
        }
    }

    /// Replace the separator
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Load options from a TOML file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read options file: {}", e)))?;

        Self::from_toml_str(&contents)
    }

    /// Parse options from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let options: BagOptions = toml::from_str(contents)
            .map_err(|e| Error::config(format!("Failed to parse options: {}", e)))?;

        options.validate()?;
        Ok(options)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.separator.is_empty() {
            return Err(Error::config("Separator must not be empty"));
        }

        Ok(())
    }
}

//! Type system configuration
//!
//! Limits and defaults applied by the [`TypeFactory`](crate::TypeFactory).
//! Loaded from JSON; every key is optional.

use crate::type_name::{
    MAX_CHAR_LENGTH, MAX_DATETIME_PRECISION, MAX_NUMERIC_PRECISION, MAX_NUMERIC_SCALE, TypeName,
};
use quarry_sql_diagnostics::{Result, TypeError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TypeSystemConfig {
    /// Charset given to character types created without one
    pub default_charset: String,
    /// Collation given to character types created without one
    pub default_collation: String,
    pub max_numeric_precision: u32,
    pub max_numeric_scale: u32,
    pub max_datetime_precision: u32,
    pub max_char_length: u32,
}

impl Default for TypeSystemConfig {
    fn default() -> Self {
        Self {
            default_charset: "ISO-8859-1".to_string(),
            default_collation: "ISO-8859-1$en_US$primary".to_string(),
            max_numeric_precision: MAX_NUMERIC_PRECISION,
            max_numeric_scale: MAX_NUMERIC_SCALE,
            max_datetime_precision: MAX_DATETIME_PRECISION,
            max_char_length: MAX_CHAR_LENGTH,
        }
    }
}

impl TypeSystemConfig {
    /// Load a configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| TypeError::invalid_config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            TypeError::invalid_config(format!("{}: {e}", path.as_ref().display()))
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_charset.is_empty() {
            return Err(TypeError::invalid_config("defaultCharset must not be empty"));
        }
        if self.max_numeric_precision == 0 || self.max_char_length == 0 {
            return Err(TypeError::invalid_config(
                "maximum precisions must be positive",
            ));
        }
        if self.max_numeric_scale > self.max_numeric_precision {
            return Err(TypeError::invalid_config(format!(
                "maxNumericScale {} exceeds maxNumericPrecision {}",
                self.max_numeric_scale, self.max_numeric_precision
            )));
        }
        Ok(())
    }

    /// Largest precision accepted for `name` under this configuration
    pub fn max_precision(&self, name: TypeName) -> Option<u32> {
        match name {
            TypeName::Decimal => Some(self.max_numeric_precision),
            TypeName::Time | TypeName::Timestamp => Some(self.max_datetime_precision),
            TypeName::Char | TypeName::Varchar | TypeName::Binary | TypeName::Varbinary => {
                Some(self.max_char_length)
            }
            _ => name.max_precision(),
        }
    }
}

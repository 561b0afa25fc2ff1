#![forbid(unsafe_code)]

//! View-model options: where to mount and what data to bind.
//!
//! Options can be built in code or loaded as data:
//!
//! ```json
//! { "el": "#app", "data": { "name": "Ada" } }
//! ```
//!
//! With the `options-toml` feature the same shape can be read from TOML:
//!
//! ```toml
//! el = "#app"
//!
//! [data]
//! name = "Ada"
//! ```

use serde::Deserialize;

use crate::error::VmError;
use crate::reactive::Value;

/// Mount selector plus initial data.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VmOptions {
    /// Selector of the mount element (`#id` or a tag name).
    pub el: String,
    /// Initial data. Anything other than an object mounts an empty object.
    #[serde(default)]
    pub data: serde_json::Value,
}

impl VmOptions {
    #[must_use]
    pub fn new(el: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            el: el.into(),
            data,
        }
    }

    /// Parse options from a JSON document.
    pub fn from_json_str(input: &str) -> Result<Self, VmError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Parse options from a TOML document.
    #[cfg(feature = "options-toml")]
    pub fn from_toml_str(input: &str) -> Result<Self, VmError> {
        Ok(toml::from_str(input)?)
    }

    /// The data converted to a [`Value`] (not yet observed).
    #[must_use]
    pub fn data_value(&self) -> Value {
        Value::from(self.data.clone())
    }
}

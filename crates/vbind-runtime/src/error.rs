#![forbid(unsafe_code)]

//! Errors from mounting a view-model.
//!
//! The binding core itself is total: unknown directives, plain text and
//! missing keys are not errors. Only option parsing and mount-target lookup
//! can fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VmError {
    /// The `el` selector matched nothing in the document.
    #[error("mount target not found: {0}")]
    MountNotFound(String),
    /// The `el` selector was empty.
    #[error("mount selector is empty")]
    EmptySelector,
    /// Options JSON could not be parsed.
    #[error("invalid view-model options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
    /// Options TOML could not be parsed.
    #[cfg(feature = "options-toml")]
    #[error("invalid view-model options (TOML): {0}")]
    InvalidToml(#[from] toml::de::Error),
}

//! Error types for argument binding and config-file loading
//!
//! Only [`ConfigFileError`] ever escapes a parse. [`CoercionError`] is
//! produced per field and absorbed by the binder; a required field that
//! could not be coerced shows up later as a missing-field validation error.

use std::path::PathBuf;
use thiserror::Error;

/// A raw token could not be converted to its field's type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    /// The value is not a valid GUID.
    #[error("'{value}' is not a valid GUID")]
    InvalidGuid { value: String },

    /// The value does not name a known event status.
    #[error("'{value}' is not a known event status (expected New, Update or Resolved)")]
    UnknownEventStatus { value: String },
}

/// The JSON config file was found but could not be used.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// The file exists but reading it failed.
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON for the expected layout.
    #[error("config file {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A `defaultEvents` entry names an unknown event status.
    #[error("config file {path} lists an unknown default event: {source}")]
    UnknownEvent {
        path: PathBuf,
        #[source]
        source: CoercionError,
    },
}

//! JSON config file supplying default argument values
//!
//! The file is bound before any other field, so anything it provides is the
//! starting state that explicit command-line arguments overwrite.
//!
//! # Example
//!
//! ```json
//! {
//!   "applicationId": "8b0a1c9e-0f6b-4b5e-9f0e-1f2d3c4b5a69",
//!   "directoryName": "contoso",
//!   "defaultResourceLocation": "westus",
//!   "emails": [ { "address": "ops@contoso.com" } ],
//!   "defaultEvents": [ { "event": "New" }, { "event": "Resolved" } ]
//! }
//! ```

use indexmap::IndexSet;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::alert::EventStatus;
use crate::binder::BindContext;
use crate::cli::Arguments;
use crate::error::{CoercionError, ConfigFileError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFileDefaults {
    pub application_id: Option<String>,
    pub directory_name: Option<String>,
    pub default_resource_location: Option<String>,
    #[serde(default)]
    pub emails: Option<Vec<EmailEntry>>,
    #[serde(default)]
    pub default_events: Option<Vec<DefaultEvent>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmailEntry {
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DefaultEvent {
    pub event: String,
}

impl ConfigFileDefaults {
    /// Distinct email addresses in first-seen order, skipping null entries.
    pub fn distinct_emails(&self) -> Vec<String> {
        self.emails
            .iter()
            .flatten()
            .filter_map(|entry| entry.address.clone())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct default events in first-seen order.
    pub fn distinct_events(&self) -> Result<Vec<EventStatus>, CoercionError> {
        let events = self
            .default_events
            .iter()
            .flatten()
            .map(|entry| entry.event.parse::<EventStatus>())
            .collect::<Result<IndexSet<_>, _>>()?;
        Ok(events.into_iter().collect())
    }

    /// Copies every value present in the file into `args`.
    ///
    /// Missing, null and empty entries leave the matching field untouched.
    pub fn apply(&self, args: &mut Arguments) -> Result<(), CoercionError> {
        let events = self.distinct_events()?;
        let emails = self.distinct_emails();

        if let Some(application_id) = &self.application_id {
            args.application_id = Some(application_id.clone());
        }
        if let Some(directory) = &self.directory_name {
            args.directory = Some(directory.clone());
        }
        if let Some(location) = &self.default_resource_location {
            args.resource_location = Some(location.clone());
        }

        if !events.is_empty() {
            args.event_status = Some(events);
        }
        if !emails.is_empty() {
            args.emails = Some(emails);
        }

        Ok(())
    }
}

/// Finds the config file, first as given and then next to the program.
pub fn resolve(path: &Path, program_dir: Option<&Path>) -> Option<PathBuf> {
    if path.is_file() {
        return Some(path.to_path_buf());
    }

    program_dir
        .map(|dir| dir.join(path))
        .filter(|candidate| candidate.is_file())
}

/// Reads and parses the config file at `path`.
pub fn load(path: &Path) -> Result<ConfigFileDefaults, ConfigFileError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    // Tolerate a leading UTF-8 byte order mark
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
    serde_json::from_str(text).map_err(|source| ConfigFileError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves, loads and applies the config file named by `raw`.
///
/// Returns the path that was loaded, or `None` when no file was found.
pub fn load_into(
    raw: &str,
    ctx: &BindContext,
    args: &mut Arguments,
) -> Result<Option<PathBuf>, ConfigFileError> {
    let Some(path) = resolve(Path::new(raw), ctx.program_dir.as_deref()) else {
        debug!(path = %raw, "config file not found, continuing without defaults");
        return Ok(None);
    };

    let defaults = load(&path)?;
    defaults
        .apply(args)
        .map_err(|source| ConfigFileError::UnknownEvent {
            path: path.clone(),
            source,
        })?;

    info!(path = %path.display(), "loaded defaults from config file");
    Ok(Some(path))
}

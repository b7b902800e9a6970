//! Binds tokens to the field schema
//!
//! Binding is best effort. A value that cannot be coerced leaves its field
//! as it was (unset, or holding a config-file default) and is only logged.
//! Required fields that end up unset are reported by
//! [`crate::validation::validate`]. The one failure that does propagate is
//! an unusable config file.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::cli::Arguments;
use crate::error::{CoercionError, ConfigFileError};
use crate::schema::{binding_order, FieldDescriptor};
use crate::tokenizer::{unquote, TokenMap};

/// Characters that separate list elements.
pub const LIST_DELIMITERS: [char; 4] = [',', ';', ':', '|'];

const QUOTES: [char; 2] = ['\'', '"'];

/// Failure while binding a single field.
#[derive(Debug, Error)]
pub enum BindError {
    #[error(transparent)]
    Coercion(#[from] CoercionError),

    #[error(transparent)]
    ConfigFile(#[from] ConfigFileError),
}

/// Environment the binder resolves relative resources against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindContext {
    /// Fallback directory for a relative config-file path.
    pub program_dir: Option<PathBuf>,
}

impl BindContext {
    /// Uses the directory of the running executable as the fallback.
    pub fn from_current_exe() -> Self {
        let program_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        Self { program_dir }
    }

    pub fn with_program_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            program_dir: Some(dir.into()),
        }
    }
}

/// Applies `tokens` to `args` in binding-priority order.
pub fn bind(
    tokens: &TokenMap,
    schema: &[FieldDescriptor],
    args: &mut Arguments,
    ctx: &BindContext,
) -> Result<(), ConfigFileError> {
    for descriptor in binding_order(schema) {
        let Some(raw) = tokens.get(&descriptor.key()) else {
            continue;
        };

        match descriptor.bind(args, raw, ctx) {
            Ok(()) => debug!(field = descriptor.name, "bound argument"),
            Err(BindError::Coercion(e)) => {
                debug!(field = descriptor.name, error = %e, "ignoring value that could not be coerced");
            }
            Err(BindError::ConfigFile(e)) => return Err(e),
        }
    }

    Ok(())
}

/// Splits a list value on any of [`LIST_DELIMITERS`], stripping quotes around each element.
///
/// # Examples
///
/// ```
/// use azure_events::binder::split_list;
///
/// assert_eq!(split_list("a,b;c:d|e"), vec!["a", "b", "c", "d", "e"]);
/// assert_eq!(split_list("'x',\"y\""), vec!["x", "y"]);
/// ```
pub fn split_list(raw: &str) -> Vec<&str> {
    raw.split(LIST_DELIMITERS)
        .map(|item| item.trim_matches(QUOTES))
        .collect()
}

/// Coerces every element of a list value, failing on the first bad element.
pub fn coerce_list<T, F>(raw: &str, element: F) -> Result<Vec<T>, CoercionError>
where
    F: Fn(&str) -> Result<T, CoercionError>,
{
    split_list(raw).into_iter().map(element).collect()
}

pub fn coerce_guid(raw: &str) -> Result<Uuid, CoercionError> {
    Uuid::parse_str(unquote(raw.trim())).map_err(|_| CoercionError::InvalidGuid {
        value: raw.to_string(),
    })
}

//! Command-line entry point for azure-events
//!
//! Parsing runs a fixed pipeline over the raw argument vector:
//!
//! 1. [`tokenize`](crate::tokenizer::tokenize) the arguments
//! 2. short-circuit to the help screen when nothing usable was given or
//!    `-?`, `-h` or `-help` is present
//! 3. bind the config file (if any), then every other field, in priority order
//! 4. collect every required field that is still unset
//!
//! # Exit codes
//!
//! Callers are expected to exit with 0 after showing help, 1 when validation
//! errors are returned, and something else for downstream service failures.

use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

use crate::alert::EventStatus;
use crate::binder::{bind, BindContext};
use crate::error::ConfigFileError;
use crate::help;
use crate::schema::schema;
use crate::tokenizer::tokenize;
use crate::validation::{validate, ValidationError};

pub const PROGRAM_NAME: &str = "azure-events";

const MASK: &str = "********";

/// Values bound from the command line and config file.
///
/// Every field is optional here; [`Arguments::settings`] turns a complete set
/// into [`AlertSettings`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Arguments {
    pub json_config: Option<PathBuf>,
    pub subscription_id: Option<Uuid>,
    pub password: Option<String>,
    pub resource_name: Option<String>,
    pub directory: Option<String>,
    pub resource_location: Option<String>,
    pub application_id: Option<String>,
    pub event_status: Option<Vec<EventStatus>>,
    pub emails: Option<Vec<String>>,
}

/// Result of a parse that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Help was requested; the rendered screen is attached.
    Help(String),
    Parsed {
        arguments: Arguments,
        errors: Vec<ValidationError>,
    },
}

/// Fully populated settings for the provisioning workflow.
#[derive(Clone, PartialEq, Eq)]
pub struct AlertSettings {
    pub subscription_id: Uuid,
    pub password: String,
    pub resource_name: String,
    pub directory: String,
    pub resource_location: String,
    pub application_id: String,
    pub event_status: Vec<EventStatus>,
    pub emails: Vec<String>,
}

impl Arguments {
    /// Parses `args` (without the program name), looking for a relative
    /// config file next to the running executable as a fallback.
    ///
    /// # Examples
    ///
    /// ```
    /// use azure_events::cli::{Arguments, ParseOutcome};
    ///
    /// let outcome = Arguments::parse(Vec::<String>::new()).unwrap();
    /// assert!(matches!(outcome, ParseOutcome::Help(_)));
    /// ```
    pub fn parse<I, S>(args: I) -> Result<ParseOutcome, ConfigFileError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::parse_with(args, &BindContext::from_current_exe())
    }

    pub fn parse_with<I, S>(args: I, ctx: &BindContext) -> Result<ParseOutcome, ConfigFileError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens = tokenize(args);
        let schema = schema();

        if tokens.is_empty() || tokens.wants_help() {
            return Ok(ParseOutcome::Help(help::render(schema)));
        }

        let mut arguments = Arguments::default();
        bind(&tokens, schema, &mut arguments, ctx)?;
        let errors = validate(schema, &arguments);

        Ok(ParseOutcome::Parsed { arguments, errors })
    }

    /// Returns the settings when every required value is present.
    pub fn settings(&self) -> Option<AlertSettings> {
        Some(AlertSettings {
            subscription_id: self.subscription_id?,
            password: self.password.clone()?,
            resource_name: self.resource_name.clone()?,
            directory: self.directory.clone()?,
            resource_location: self.resource_location.clone()?,
            application_id: self.application_id.clone()?,
            event_status: self.event_status.clone()?,
            emails: self.emails.clone()?,
        })
    }
}

impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arguments")
            .field("json_config", &self.json_config)
            .field("subscription_id", &self.subscription_id)
            .field("password", &self.password.as_ref().map(|_| MASK))
            .field("resource_name", &self.resource_name)
            .field("directory", &self.directory)
            .field("resource_location", &self.resource_location)
            .field("application_id", &self.application_id)
            .field("event_status", &self.event_status)
            .field("emails", &self.emails)
            .finish()
    }
}

impl fmt::Debug for AlertSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertSettings")
            .field("subscription_id", &self.subscription_id)
            .field("password", &MASK)
            .field("resource_name", &self.resource_name)
            .field("directory", &self.directory)
            .field("resource_location", &self.resource_location)
            .field("application_id", &self.application_id)
            .field("event_status", &self.event_status)
            .field("emails", &self.emails)
            .finish()
    }
}

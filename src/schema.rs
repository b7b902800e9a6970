//! Static field schema for the command line
//!
//! Every bindable field is described once, in display order, by a
//! [`FieldDescriptor`]. Each descriptor carries a typed setter chosen when the
//! table is built, so binding never has to inspect types at runtime.

use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::alert::EventStatus;
use crate::binder::{coerce_guid, coerce_list, BindContext, BindError};
use crate::cli::Arguments;
use crate::config_file;

/// Priority given to fields that do not ask for one; they bind last.
pub const DEFAULT_PRIORITY: u32 = u32::MAX;

/// Priority of the config-file field. It binds before everything else.
pub const CONFIG_FILE_PRIORITY: u32 = 1;

/// Assigns a raw token to its field.
pub type Setter = fn(&mut Arguments, &str, &BindContext) -> Result<(), BindError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Text,
    Path,
    Guid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    Text,
    EventStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Scalar(ScalarType),
    List(ElementType),
}

/// Metadata and binding behavior for one command-line field.
#[derive(Clone, Copy)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub required: bool,
    pub priority: u32,
    pub help: &'static str,
    pub error: &'static str,
    pub kind: FieldKind,
    setter: Setter,
    probe: fn(&Arguments) -> bool,
}

impl FieldDescriptor {
    fn optional(
        name: &'static str,
        kind: FieldKind,
        help: &'static str,
        setter: Setter,
        probe: fn(&Arguments) -> bool,
    ) -> Self {
        Self {
            name,
            required: false,
            priority: DEFAULT_PRIORITY,
            help,
            error: "",
            kind,
            setter,
            probe,
        }
    }

    fn required(mut self, error: &'static str) -> Self {
        self.required = true;
        self.error = error;
        self
    }

    fn priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Token key this field is looked up under.
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }

    /// Coerces `raw` and stores it in `args`.
    ///
    /// On a coercion error the field is left exactly as it was.
    pub fn bind(&self, args: &mut Arguments, raw: &str, ctx: &BindContext) -> Result<(), BindError> {
        (self.setter)(args, raw, ctx)
    }

    /// Whether `args` holds a value for this field.
    pub fn is_set(&self, args: &Arguments) -> bool {
        (self.probe)(args)
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("priority", &self.priority)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

const REQUIRED: &str = "is a required argument";
const REQUIRED_WITHOUT_CONFIG: &str = "is a required argument when not included in the jsonConfig file";

/// The command-line schema, in declaration (help) order.
pub fn schema() -> &'static [FieldDescriptor] {
    static SCHEMA: OnceLock<Vec<FieldDescriptor>> = OnceLock::new();
    SCHEMA.get_or_init(build_schema)
}

fn build_schema() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::optional(
            "jsonConfig",
            FieldKind::Scalar(ScalarType::Path),
            "Path to a JSON file containing the default configuration values (directory name, emails, events, etc)",
            |args, raw, ctx| {
                let path = config_file::load_into(raw, ctx, args)?;
                args.json_config = Some(path.unwrap_or_else(|| PathBuf::from(raw)));
                Ok(())
            },
            |args| args.json_config.is_some(),
        )
        .priority(CONFIG_FILE_PRIORITY),
        FieldDescriptor::optional(
            "subscriptionId",
            FieldKind::Scalar(ScalarType::Guid),
            "Subscription ID for the subscription containing the resource you want to alert on. This is the GUID value, not the name",
            |args, raw, _| {
                args.subscription_id = Some(coerce_guid(raw)?);
                Ok(())
            },
            |args| args.subscription_id.is_some(),
        )
        .required(REQUIRED),
        FieldDescriptor::optional(
            "password",
            FieldKind::Scalar(ScalarType::Text),
            "Password for the service identity that will set the alerts",
            |args, raw, _| {
                args.password = Some(raw.to_string());
                Ok(())
            },
            |args| args.password.is_some(),
        )
        .required(REQUIRED),
        FieldDescriptor::optional(
            "resourceName",
            FieldKind::Scalar(ScalarType::Text),
            "Name of the Azure resource group to add the alert to",
            |args, raw, _| {
                args.resource_name = Some(raw.to_string());
                Ok(())
            },
            |args| args.resource_name.is_some(),
        )
        .required(REQUIRED),
        FieldDescriptor::optional(
            "directory",
            FieldKind::Scalar(ScalarType::Text),
            "Name of the AAD directory to use. This is the part before the 'onmicrosoft.com'. [Optional if jsonConfig is specified]",
            |args, raw, _| {
                args.directory = Some(raw.to_string());
                Ok(())
            },
            |args| args.directory.is_some(),
        )
        .required(REQUIRED_WITHOUT_CONFIG),
        FieldDescriptor::optional(
            "resourceLocation",
            FieldKind::Scalar(ScalarType::Text),
            "The Azure region the resource is located in. [Optional if jsonConfig is specified]",
            |args, raw, _| {
                args.resource_location = Some(raw.to_string());
                Ok(())
            },
            |args| args.resource_location.is_some(),
        )
        .required(REQUIRED_WITHOUT_CONFIG),
        FieldDescriptor::optional(
            "applicationId",
            FieldKind::Scalar(ScalarType::Text),
            "The Guid value for the service account used to authenticate to Azure. [Optional if jsonConfig is specified]",
            |args, raw, _| {
                args.application_id = Some(raw.to_string());
                Ok(())
            },
            |args| args.application_id.is_some(),
        )
        .required(REQUIRED_WITHOUT_CONFIG),
        FieldDescriptor::optional(
            "eventStatus",
            FieldKind::List(ElementType::EventStatus),
            "The type of event notification(s) to subscribe to: New,Update,Resolved. Separate with a comma (,) to list more than one. [Optional if jsonConfig is specified]",
            |args, raw, _| {
                args.event_status = Some(coerce_list(raw, str::parse::<EventStatus>)?);
                Ok(())
            },
            |args| args.event_status.is_some(),
        )
        .required(REQUIRED_WITHOUT_CONFIG),
        FieldDescriptor::optional(
            "emails",
            FieldKind::List(ElementType::Text),
            "Email address(es) to send notifications to. Separate with a comma (,) to list more than one. [Optional if jsonConfig is specified]",
            |args, raw, _| {
                args.emails = Some(coerce_list(raw, |item| Ok(item.to_string()))?);
                Ok(())
            },
            |args| args.emails.is_some(),
        )
        .required(REQUIRED_WITHOUT_CONFIG),
    ]
}

/// Descriptors sorted by ascending priority; ties keep declaration order.
pub fn binding_order(schema: &[FieldDescriptor]) -> Vec<&FieldDescriptor> {
    let mut ordered: Vec<&FieldDescriptor> = schema.iter().collect();
    ordered.sort_by_key(|descriptor| descriptor.priority);
    ordered
}

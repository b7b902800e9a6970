//! Service health alert rules
//!
//! One rule exists per [`EventStatus`]. Each rule listens for `Azure.Health`
//! management events in a given incident state and notifies a fixed list of
//! email addresses. The serialized form matches the classic
//! `microsoft.insights/alertrules` management payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoercionError;

/// Resource provider that publishes service health incidents.
pub const HEALTH_PROVIDER: &str = "Azure.Health";

const CONDITION_TYPE: &str = "Microsoft.Azure.Management.Insights.Models.ManagementEventRuleCondition";
const DATA_SOURCE_TYPE: &str = "Microsoft.Azure.Management.Insights.Models.RuleManagementEventDataSource";
const EMAIL_ACTION_TYPE: &str = "Microsoft.Azure.Management.Insights.Models.RuleEmailAction";

/// Lifecycle stage of a service health incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventStatus {
    New,
    Update,
    Resolved,
}

impl EventStatus {
    pub const ALL: [EventStatus; 3] = [EventStatus::New, EventStatus::Update, EventStatus::Resolved];

    pub fn name(self) -> &'static str {
        match self {
            EventStatus::New => "New",
            EventStatus::Update => "Update",
            EventStatus::Resolved => "Resolved",
        }
    }

    /// Incident status reported by the health provider for this stage.
    pub fn provider_status(self) -> &'static str {
        match self {
            EventStatus::New => "Active",
            EventStatus::Update => "InProgress",
            EventStatus::Resolved => "Resolved",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Case-insensitive match against the variant names.
impl FromStr for EventStatus {
    type Err = CoercionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        EventStatus::ALL
            .into_iter()
            .find(|status| status.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoercionError::UnknownEventStatus { value: s.to_string() })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleManagementEventDataSource {
    #[serde(rename = "odata.type")]
    pub odata_type: String,
    pub resource_provider_name: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagementEventRuleCondition {
    #[serde(rename = "odata.type")]
    pub odata_type: String,
    pub data_source: RuleManagementEventDataSource,
    pub aggregation: Option<serde_json::Value>,
}

/// Sends an email to a custom list of addresses when the rule fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleEmailAction {
    #[serde(rename = "odata.type")]
    pub odata_type: String,
    pub send_to_service_owners: bool,
    pub custom_emails: Vec<String>,
}

impl RuleEmailAction {
    pub fn new(custom_emails: Vec<String>) -> Self {
        Self {
            odata_type: EMAIL_ACTION_TYPE.to_string(),
            send_to_service_owners: false,
            custom_emails,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRule {
    pub name: String,
    pub description: String,
    pub is_enabled: bool,
    pub condition: ManagementEventRuleCondition,
    pub actions: Vec<RuleEmailAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_time: Option<DateTime<Utc>>,
}

impl AlertRule {
    /// Builds the incident rule for `status` with no actions attached.
    ///
    /// # Examples
    ///
    /// ```
    /// use azure_events::alert::{AlertRule, EventStatus};
    ///
    /// let rule = AlertRule::for_event(EventStatus::Update);
    /// assert_eq!(rule.name, "Update_Incident_Alert");
    /// assert_eq!(rule.condition.data_source.status, "InProgress");
    /// ```
    pub fn for_event(status: EventStatus) -> Self {
        let (name, description) = match status {
            EventStatus::New => (
                "Active_Incident_Alert",
                "This alert will be triggered when an Azure Incident is published",
            ),
            EventStatus::Update => (
                "Update_Incident_Alert",
                "This alert will be triggered when an Azure Incident is updated",
            ),
            EventStatus::Resolved => (
                "Resolved_Incident_Alert",
                "This alert will be triggered when an Azure Incident is resolved",
            ),
        };

        Self {
            name: name.to_string(),
            description: description.to_string(),
            is_enabled: true,
            condition: ManagementEventRuleCondition {
                odata_type: CONDITION_TYPE.to_string(),
                data_source: RuleManagementEventDataSource {
                    odata_type: DATA_SOURCE_TYPE.to_string(),
                    resource_provider_name: HEALTH_PROVIDER.to_string(),
                    status: status.provider_status().to_string(),
                },
                aggregation: None,
            },
            actions: Vec::new(),
            last_updated_time: None,
        }
    }

    /// The event status this rule listens for, derived from its data source.
    pub fn event_status(&self) -> Option<EventStatus> {
        let status = &self.condition.data_source.status;
        EventStatus::ALL
            .into_iter()
            .find(|s| s.provider_status().eq_ignore_ascii_case(status))
    }
}

/// Body of a create-or-update alert rule request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleCreateOrUpdate {
    pub location: String,
    pub properties: AlertRule,
}

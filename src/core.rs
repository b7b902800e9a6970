//! Alert provisioning workflow
//!
//! Given complete [`AlertSettings`], the provisioner:
//! 1. resolves the directory name to a tenant id
//! 2. acquires a management token for the service identity
//! 3. builds one health incident rule per selected event status
//! 4. attaches the email action and submits every rule
//!
//! The remote side is abstracted behind [`AzureServices`] so the workflow can
//! run against [`crate::http::HttpClient`] or an in-memory stand-in.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::alert::{AlertRule, EventStatus, RuleCreateOrUpdate, RuleEmailAction};
use crate::cli::AlertSettings;

/// Remote operations the workflow depends on.
#[async_trait]
pub trait AzureServices: Send + Sync {
    /// Looks up the tenant id behind `<directory>.onmicrosoft.com`.
    async fn resolve_tenant(&self, directory: &str) -> Option<String>;

    /// Acquires a management access token with client credentials.
    async fn acquire_token(&self, tenant_id: &str, application_id: &str, password: &str) -> Result<String>;

    /// Creates or replaces one alert rule in `resource_group`.
    async fn create_or_update_rule(
        &self,
        token: &str,
        subscription_id: &Uuid,
        resource_group: &str,
        request: &RuleCreateOrUpdate,
    ) -> Result<StatusCode>;
}

#[async_trait]
impl<T: AzureServices + ?Sized> AzureServices for &T {
    async fn resolve_tenant(&self, directory: &str) -> Option<String> {
        (**self).resolve_tenant(directory).await
    }

    async fn acquire_token(&self, tenant_id: &str, application_id: &str, password: &str) -> Result<String> {
        (**self).acquire_token(tenant_id, application_id, password).await
    }

    async fn create_or_update_rule(
        &self,
        token: &str,
        subscription_id: &Uuid,
        resource_group: &str,
        request: &RuleCreateOrUpdate,
    ) -> Result<StatusCode> {
        (**self)
            .create_or_update_rule(token, subscription_id, resource_group, request)
            .await
    }
}

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Unable to get Tenant ID from directory name '{directory}'. Please double check that your directory name is correct and try again")]
    TenantNotFound { directory: String },

    #[error("failed to obtain an access token: {0:#}")]
    Authentication(anyhow::Error),

    #[error("failed to create alert rule {rule}: {error:#}")]
    Rule { rule: String, error: anyhow::Error },
}

/// What happened to one submitted rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub rule_name: String,
    pub event: EventStatus,
    pub emails: Vec<String>,
    pub status: StatusCode,
}

pub struct AlertProvisioner<S> {
    services: S,
}

impl<S: AzureServices> AlertProvisioner<S> {
    pub fn new(services: S) -> Self {
        Self { services }
    }

    /// Builds the rules for `settings`, one per event status in the order given.
    pub fn build_rules(settings: &AlertSettings) -> Vec<AlertRule> {
        let action = RuleEmailAction::new(settings.emails.clone());
        settings
            .event_status
            .iter()
            .map(|status| {
                let mut rule = AlertRule::for_event(*status);
                rule.actions.push(action.clone());
                rule
            })
            .collect()
    }

    /// Runs the full workflow, stopping at the first failure.
    pub async fn provision(&self, settings: &AlertSettings) -> Result<Vec<RuleOutcome>, ProvisionError> {
        let tenant_id = self
            .services
            .resolve_tenant(settings.directory.trim())
            .await
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ProvisionError::TenantNotFound {
                directory: settings.directory.clone(),
            })?;
        debug!(tenant = %tenant_id, "resolved directory tenant");

        let token = self
            .services
            .acquire_token(&tenant_id, &settings.application_id, &settings.password)
            .await
            .map_err(ProvisionError::Authentication)?;

        let mut outcomes = Vec::with_capacity(settings.event_status.len());
        for (status, mut rule) in settings.event_status.iter().zip(Self::build_rules(settings)) {
            rule.last_updated_time = Some(Utc::now());
            let rule_name = rule.name.clone();
            let emails = rule
                .actions
                .first()
                .map(|action| action.custom_emails.clone())
                .unwrap_or_default();

            let request = RuleCreateOrUpdate {
                location: settings.resource_location.clone(),
                properties: rule,
            };

            let status_code = self
                .services
                .create_or_update_rule(&token, &settings.subscription_id, &settings.resource_name, &request)
                .await
                .map_err(|error| ProvisionError::Rule {
                    rule: rule_name.clone(),
                    error,
                })?;
            info!(rule = %rule_name, status = %status_code, "submitted alert rule");

            outcomes.push(RuleOutcome {
                rule_name,
                event: *status,
                emails,
                status: status_code,
            });
        }

        Ok(outcomes)
    }
}

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use azure_events::alert::{EventStatus, RuleCreateOrUpdate};
use azure_events::cli::AlertSettings;
use azure_events::core::{AlertProvisioner, AzureServices, ProvisionError};
use reqwest::StatusCode;
use std::sync::Mutex;
use uuid::Uuid;

/// In-memory stand-in that records every submitted rule.
#[derive(Default)]
struct FakeAzure {
    tenant: Option<String>,
    reject_token: bool,
    fail_rule: Option<String>,
    submitted: Mutex<Vec<(String, RuleCreateOrUpdate)>>,
}

#[async_trait]
impl AzureServices for FakeAzure {
    async fn resolve_tenant(&self, directory: &str) -> Option<String> {
        assert_eq!(directory, "contoso");
        self.tenant.clone()
    }

    async fn acquire_token(&self, tenant_id: &str, application_id: &str, password: &str) -> Result<String> {
        if self.reject_token {
            return Err(anyhow!("AADSTS7000215: Invalid client secret"));
        }
        Ok(format!("token-{tenant_id}-{application_id}-{}", password.len()))
    }

    async fn create_or_update_rule(
        &self,
        token: &str,
        _subscription_id: &Uuid,
        resource_group: &str,
        request: &RuleCreateOrUpdate,
    ) -> Result<StatusCode> {
        assert!(token.starts_with("token-tenant-id-"));
        assert_eq!(resource_group, "health-rg");
        if self.fail_rule.as_deref() == Some(request.properties.name.as_str()) {
            return Err(anyhow!("request failed with status 400 Bad Request"));
        }
        self.submitted
            .lock()
            .unwrap()
            .push((resource_group.to_string(), request.clone()));
        Ok(StatusCode::CREATED)
    }
}

fn settings(events: Vec<EventStatus>) -> AlertSettings {
    AlertSettings {
        subscription_id: Uuid::nil(),
        password: "s3cret".to_string(),
        resource_name: "health-rg".to_string(),
        directory: " contoso ".to_string(),
        resource_location: "westus".to_string(),
        application_id: "app".to_string(),
        event_status: events,
        emails: vec!["ops@contoso.com".to_string(), "oncall@contoso.com".to_string()],
    }
}

fn fake() -> FakeAzure {
    FakeAzure {
        tenant: Some("tenant-id".to_string()),
        ..FakeAzure::default()
    }
}

#[tokio::test]
async fn test_provisions_one_rule_per_event() -> Result<()> {
    let provisioner = AlertProvisioner::new(fake());
    let outcomes = provisioner
        .provision(&settings(vec![EventStatus::Resolved, EventStatus::New]))
        .await?;

    let names: Vec<&str> = outcomes.iter().map(|o| o.rule_name.as_str()).collect();
    assert_eq!(names, vec!["Resolved_Incident_Alert", "Active_Incident_Alert"]);
    assert!(outcomes.iter().all(|o| o.status == StatusCode::CREATED));
    assert_eq!(outcomes[0].event, EventStatus::Resolved);
    assert_eq!(outcomes[1].emails.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_submitted_rules_carry_location_action_and_timestamp() -> Result<()> {
    let services = fake();
    let provisioner = AlertProvisioner::new(&services);
    provisioner.provision(&settings(vec![EventStatus::Update])).await?;

    let submitted = services.submitted.lock().unwrap();
    assert_eq!(submitted.len(), 1);

    let (_, request) = &submitted[0];
    assert_eq!(request.location, "westus");
    assert_eq!(request.properties.condition.data_source.status, "InProgress");
    assert_eq!(request.properties.actions.len(), 1);
    assert!(!request.properties.actions[0].send_to_service_owners);
    assert_eq!(
        request.properties.actions[0].custom_emails,
        vec!["ops@contoso.com", "oncall@contoso.com"]
    );
    assert!(request.properties.last_updated_time.is_some());
    Ok(())
}

#[tokio::test]
async fn test_unknown_directory_is_reported() {
    let provisioner = AlertProvisioner::new(FakeAzure::default());
    let err = provisioner
        .provision(&settings(vec![EventStatus::New]))
        .await
        .unwrap_err();

    assert!(matches!(err, ProvisionError::TenantNotFound { .. }));
}

#[tokio::test]
async fn test_empty_tenant_counts_as_not_found() {
    let provisioner = AlertProvisioner::new(FakeAzure {
        tenant: Some(String::new()),
        ..FakeAzure::default()
    });
    let err = provisioner
        .provision(&settings(vec![EventStatus::New]))
        .await
        .unwrap_err();

    assert!(matches!(err, ProvisionError::TenantNotFound { .. }));
}

#[tokio::test]
async fn test_token_failure_stops_before_any_rule() {
    let services = FakeAzure {
        reject_token: true,
        ..fake()
    };
    let provisioner = AlertProvisioner::new(&services);
    let err = provisioner
        .provision(&settings(vec![EventStatus::New]))
        .await
        .unwrap_err();

    assert!(matches!(err, ProvisionError::Authentication(_)));
    assert!(err.to_string().contains("Invalid client secret"));
    assert!(services.submitted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_rule_failure_names_the_rule() {
    let services = FakeAzure {
        fail_rule: Some("Update_Incident_Alert".to_string()),
        ..fake()
    };
    let provisioner = AlertProvisioner::new(&services);
    let err = provisioner
        .provision(&settings(vec![
            EventStatus::New,
            EventStatus::Update,
            EventStatus::Resolved,
        ]))
        .await
        .unwrap_err();

    match err {
        ProvisionError::Rule { rule, .. } => assert_eq!(rule, "Update_Incident_Alert"),
        other => panic!("Expected rule failure, got {other}"),
    }
    assert_eq!(services.submitted.lock().unwrap().len(), 1);
}

#[test]
fn test_build_rules_attaches_emails() {
    let rules = AlertProvisioner::<FakeAzure>::build_rules(&settings(EventStatus::ALL.to_vec()));

    assert_eq!(rules.len(), 3);
    for rule in &rules {
        assert_eq!(rule.actions.len(), 1);
        assert_eq!(rule.actions[0].custom_emails.len(), 2);
        assert!(rule.last_updated_time.is_none());
    }
}

//! HTTP client for Azure Active Directory and the management API
//!
//! Implements [`AzureServices`] with `reqwest`:
//! - tenant discovery through the directory's OpenID configuration document
//! - client-credentials token acquisition
//! - alert rule create-or-update against `microsoft.insights/alertrules`
//!
//! Every call goes through the retry policy; throttling, server errors,
//! timeouts and refused connections are retried with exponential backoff.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::alert::RuleCreateOrUpdate;
use crate::core::AzureServices;
use crate::retry::{is_retriable_status, is_transient, with_exponential_backoff, RetryConfig, UnexpectedStatus};

/// Base URLs and versions used for every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Azure AD authority, e.g. `https://login.windows.net`
    pub authority: String,
    /// Resource manager base URL
    pub management: String,
    /// Resource the access token is requested for
    pub token_resource: String,
    /// `api-version` for the alert rules API
    pub alert_rules_api_version: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            authority: "https://login.windows.net".to_string(),
            management: "https://management.azure.com".to_string(),
            token_resource: "https://management.core.windows.net/".to_string(),
            alert_rules_api_version: "2016-03-01".to_string(),
        }
    }
}

impl Endpoints {
    pub fn openid_configuration_url(&self, directory: &str) -> String {
        format!(
            "{}/{}.onmicrosoft.com/.well-known/openid-configuration",
            self.authority.trim_end_matches('/'),
            directory.trim()
        )
    }

    pub fn token_url(&self, tenant_id: &str) -> String {
        format!("{}/{}/oauth2/token", self.authority.trim_end_matches('/'), tenant_id)
    }

    pub fn alert_rule_url(&self, subscription_id: &Uuid, resource_group: &str, rule_name: &str) -> String {
        format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/microsoft.insights/alertrules/{}?api-version={}",
            self.management.trim_end_matches('/'),
            subscription_id,
            resource_group,
            rule_name,
            self.alert_rules_api_version
        )
    }
}

#[derive(Debug, Deserialize)]
struct OpenIdConfiguration {
    token_endpoint: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Extracts the tenant id from a token endpoint such as
/// `https://login.windows.net/<tenant>/oauth2/token`.
pub fn tenant_from_token_endpoint(endpoint: &str) -> Option<String> {
    endpoint
        .split('/')
        .nth(3)
        .filter(|segment| !segment.is_empty())
        .map(String::from)
}

pub struct HttpClient {
    client: Client,
    endpoints: Endpoints,
    retry_config: RetryConfig,
}

impl HttpClient {
    /// Creates a client with the given request timeout and default endpoints.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("azure-events/", env!("CARGO_PKG_VERSION")))
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoints: Endpoints::default(),
            retry_config: RetryConfig::default(),
        })
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Sends the request built by `request`, retrying transient failures.
    ///
    /// Non-success statuses become [`UnexpectedStatus`] errors.
    async fn send<F>(&self, request: F) -> Result<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let request = &request;
        with_exponential_backoff(
            || async move {
                let resp = request().send().await.context("Failed to send request")?;
                let status = resp.status();
                if status.is_success() {
                    return Ok(resp);
                }

                if is_retriable_status(status) {
                    warn!(%status, "transient failure, will retry");
                } else {
                    debug!(%status, "request rejected");
                }
                Err(anyhow::Error::new(UnexpectedStatus(status)))
            },
            is_transient,
            &self.retry_config,
        )
        .await
    }
}

#[async_trait]
impl AzureServices for HttpClient {
    async fn resolve_tenant(&self, directory: &str) -> Option<String> {
        let url = self.endpoints.openid_configuration_url(directory);
        debug!(%url, "looking up directory tenant");

        let lookup = async {
            let config: OpenIdConfiguration = self
                .send(|| self.client.get(&url))
                .await?
                .json()
                .await
                .context("Failed to parse OpenID configuration")?;
            Ok::<_, anyhow::Error>(tenant_from_token_endpoint(&config.token_endpoint))
        };

        match lookup.await {
            Ok(tenant) => tenant,
            Err(e) => {
                debug!(directory, error = %e, "tenant lookup failed");
                None
            }
        }
    }

    async fn acquire_token(&self, tenant_id: &str, application_id: &str, password: &str) -> Result<String> {
        let url = self.endpoints.token_url(tenant_id);
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", application_id),
            ("client_secret", password),
            ("resource", self.endpoints.token_resource.as_str()),
        ];

        let token: TokenResponse = self
            .send(|| self.client.post(&url).form(&form))
            .await
            .context("Failed to obtain the token")?
            .json()
            .await
            .context("Failed to parse token response")?;

        debug!("acquired management token");
        Ok(token.access_token)
    }

    async fn create_or_update_rule(
        &self,
        token: &str,
        subscription_id: &Uuid,
        resource_group: &str,
        request: &RuleCreateOrUpdate,
    ) -> Result<StatusCode> {
        let url = self
            .endpoints
            .alert_rule_url(subscription_id, resource_group, &request.properties.name);
        info!(rule = %request.properties.name, resource_group, "submitting alert rule");

        let resp = self
            .send(|| self.client.put(&url).bearer_auth(token).json(request))
            .await
            .with_context(|| format!("Failed to create or update rule {}", request.properties.name))?;

        Ok(resp.status())
    }
}

//! HTTP clients for the GitLab project API and the validation service

use async_trait::async_trait;
use eca_gate_core::{
    GateError, GateResult, ProjectApi, ProjectLookup, ServiceReply, ValidationApi,
    ValidationRequest,
};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Client for the GitLab v4 project API
pub struct GitLabClient {
    client: Client,
    base_url: String,
    token: String,
}

impl GitLabClient {
    /// Create a new client; `base_url` includes `/api/v4`
    pub fn new(base_url: &str, token: impl Into<String>, timeout: Duration) -> CliResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    async fn get_project(&self, project_id: &str) -> CliResult<ProjectLookup> {
        let url = format!("{}/projects/{}", self.base_url, project_id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn handle_response(&self, response: reqwest::Response) -> CliResult<ProjectLookup> {
        let status = response.status();
        debug!(status = status.as_u16(), "Project API responded");

        if status.is_success() {
            let body = response.text().await?;
            Ok(ProjectLookup::from_body(&body)?)
        } else if status == StatusCode::NOT_FOUND {
            Ok(ProjectLookup::NotFound)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(CliError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait]
impl ProjectApi for GitLabClient {
    async fn fetch_project(&self, project_id: &str) -> GateResult<ProjectLookup> {
        Ok(self.get_project(project_id).await?)
    }
}

/// Client for the ECA validation endpoint
pub struct EcaClient {
    client: Client,
    url: String,
}

impl EcaClient {
    pub fn new(url: &str, timeout: Duration) -> CliResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    async fn post(&self, request: &ValidationRequest) -> Result<ServiceReply, reqwest::Error> {
        let response = self.client.post(&self.url).json(request).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(status, bytes = body.len(), "Validation service responded");
        Ok(ServiceReply { status, body })
    }
}

#[async_trait]
impl ValidationApi for EcaClient {
    /// Any status is returned as-is; only transport failures are errors.
    async fn submit(&self, request: &ValidationRequest) -> GateResult<ServiceReply> {
        self.post(request).await.map_err(|e| {
            let kind = if e.is_timeout() { "timed out" } else { "request failed" };
            GateError::ServiceUnavailable(format!("{}: {}", kind, e))
        })
    }
}

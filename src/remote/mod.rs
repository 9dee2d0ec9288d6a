//! Remote run-status endpoint, used when a run executes out of process.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::provider::http::{json_headers, shared_client, status_to_error};
use crate::types::{RunId, RunResult, RunStatus, StepBlock};

/// Body of `GET run-by-id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRunState {
    pub status: RunStatus,
    #[serde(default)]
    pub steps: Vec<StepBlock>,
    #[serde(default)]
    pub output: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
}

impl From<RemoteRunState> for RunResult {
    fn from(state: RemoteRunState) -> Self {
        Self {
            status: state.status,
            steps: state.steps,
            structured_output: state.output,
            message: state.message.unwrap_or_default(),
            prompt: state.prompt.unwrap_or_default(),
        }
    }
}

/// Fetches the current state of a run by id.
#[async_trait]
pub trait RemoteRunClient: Send + Sync {
    /// Non-success responses are errors; they are not retried.
    async fn fetch_run(&self, run_id: &RunId) -> Result<RunResult>;
}

/// [`RemoteRunClient`] over HTTP: `GET {base_url}/v1/agent-runs/{run_id}`.
#[derive(Debug, Clone)]
pub struct HttpRunClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpRunClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: shared_client().clone(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn run_url(&self, run_id: &RunId) -> String {
        format!("{}/v1/agent-runs/{}", self.base_url, run_id)
    }
}

#[async_trait]
impl RemoteRunClient for HttpRunClient {
    async fn fetch_run(&self, run_id: &RunId) -> Result<RunResult> {
        let response = self
            .client
            .get(self.run_url(run_id))
            .headers(json_headers(self.api_key.as_deref()))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(status_to_error(status.as_u16(), &body));
        }

        let state: RemoteRunState = serde_json::from_str(&body)?;
        Ok(state.into())
    }
}

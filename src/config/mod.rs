//! Configuration (layered: defaults < TOML file < environment).

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::agent_loop::{AgentDefinition, PollOptions, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_STEPS};
use crate::error::{AgentRunError, Result};
use crate::provider::http::client_with_timeout;
use crate::remote::HttpRunClient;

/// Runtime settings for orchestrated and polled runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentRunConfig {
    /// Base URL of the remote run-status service.
    pub remote_base_url: Option<String>,
    pub api_key: Option<String>,
    pub poll_interval_ms: u64,
    pub poll_max_attempts: u32,
    pub default_max_steps: u32,
    pub request_timeout_secs: u64,
}

impl Default for AgentRunConfig {
    fn default() -> Self {
        Self {
            remote_base_url: None,
            api_key: None,
            poll_interval_ms: 2_000,
            poll_max_attempts: DEFAULT_MAX_ATTEMPTS,
            default_max_steps: DEFAULT_MAX_STEPS,
            request_timeout_secs: 120,
        }
    }
}

impl AgentRunConfig {
    /// Defaults overridden by `AGENTRUN_*` environment variables (and `.env`, if present).
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML document using the same keys as the struct fields.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| AgentRunError::Configuration(e.to_string()))
    }

    /// Load a TOML file, then apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AgentRunError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        let mut config = Self::from_toml_str(&raw)?;
        let _ = dotenvy::dotenv();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup("AGENTRUN_BASE_URL") {
            self.remote_base_url = Some(url);
        }
        if let Some(key) = lookup("AGENTRUN_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(raw) = lookup("AGENTRUN_POLL_INTERVAL_MS") {
            self.poll_interval_ms = parse_env("AGENTRUN_POLL_INTERVAL_MS", &raw)?;
        }
        if let Some(raw) = lookup("AGENTRUN_POLL_MAX_ATTEMPTS") {
            self.poll_max_attempts = parse_env("AGENTRUN_POLL_MAX_ATTEMPTS", &raw)?;
        }
        if let Some(raw) = lookup("AGENTRUN_MAX_STEPS") {
            self.default_max_steps = parse_env("AGENTRUN_MAX_STEPS", &raw)?;
        }
        if let Some(raw) = lookup("AGENTRUN_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_env("AGENTRUN_REQUEST_TIMEOUT_SECS", &raw)?;
        }
        Ok(())
    }

    pub fn poll_options(&self) -> PollOptions {
        PollOptions {
            interval: Duration::from_millis(self.poll_interval_ms),
            max_attempts: self.poll_max_attempts,
        }
    }

    /// Agent with the configured step budget.
    pub fn agent_definition(&self, system_prompt: impl Into<String>) -> AgentDefinition {
        AgentDefinition::builder()
            .system_prompt(system_prompt)
            .max_steps(self.default_max_steps)
            .build()
    }

    /// HTTP client for the remote status endpoint.
    pub fn http_run_client(&self) -> Result<HttpRunClient> {
        let base_url = self.remote_base_url.as_deref().ok_or_else(|| {
            AgentRunError::Configuration(
                "remote base URL is not set (AGENTRUN_BASE_URL)".to_string(),
            )
        })?;
        let client = client_with_timeout(Duration::from_secs(self.request_timeout_secs))?;
        let mut run_client = HttpRunClient::new(base_url).with_client(client);
        if let Some(key) = &self.api_key {
            run_client = run_client.with_api_key(key.clone());
        }
        Ok(run_client)
    }
}

fn parse_env<T: FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| AgentRunError::Configuration(format!("{key}={raw:?}: {e}")))
}

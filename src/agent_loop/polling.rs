//! Remote polling fallback for runs without a local stream.

use std::sync::Arc;
use std::time::Duration;

use bon::Builder;

use crate::error::{AgentRunError, Result};
use crate::remote::RemoteRunClient;
use crate::types::{RunId, RunResult};

use super::sink::UpdateSink;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 300;

/// Spacing and budget for polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
pub struct PollOptions {
    #[builder(default = DEFAULT_POLL_INTERVAL)]
    pub interval: Duration,
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Poll `run_id` until it reaches a terminal status or the attempt budget runs out.
///
/// Every fetched state is pushed to `sink`. A failed fetch aborts immediately.
/// When the budget is exhausted the last fetched state is returned as-is, so an
/// `InProgress` result does not mean the run has finished.
pub async fn poll_run(
    client: &dyn RemoteRunClient,
    run_id: &RunId,
    options: PollOptions,
    sink: &dyn UpdateSink,
) -> Result<RunResult> {
    if options.max_attempts == 0 {
        return Err(AgentRunError::InvalidArgument(
            "max_attempts must be at least 1".to_string(),
        ));
    }

    let mut last = None;
    for attempt in 1..=options.max_attempts {
        let snapshot = client.fetch_run(run_id).await?;
        tracing::debug!(
            run_id = %run_id,
            attempt,
            status = %snapshot.status,
            "polled remote run"
        );
        sink.notify(&snapshot).await?;

        if snapshot.is_terminal() {
            return Ok(snapshot);
        }
        last = Some(snapshot);

        if attempt < options.max_attempts {
            tokio::time::sleep(options.interval).await;
        }
    }

    tracing::warn!(
        run_id = %run_id,
        attempts = options.max_attempts,
        "poll budget exhausted before the run reached a terminal status"
    );
    last.ok_or_else(|| AgentRunError::InvariantViolation("no poll attempt was made".to_string()))
}

/// Polling driver bound to one remote client.
#[derive(Clone)]
pub struct RunPoller {
    client: Arc<dyn RemoteRunClient>,
    options: PollOptions,
}

impl RunPoller {
    pub fn new(client: Arc<dyn RemoteRunClient>) -> Self {
        Self {
            client,
            options: PollOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PollOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> PollOptions {
        self.options
    }

    pub async fn poll(&self, run_id: &RunId, sink: &dyn UpdateSink) -> Result<RunResult> {
        poll_run(self.client.as_ref(), run_id, self.options, sink).await
    }
}

//! Streaming run orchestrator.

use std::sync::Arc;

use bon::Builder;
use futures::StreamExt;
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::error::{AgentRunError, ProviderErrorPayload, Result};
use crate::provider::{ModelStream, StreamRequest};
use crate::tools::{completion_tool, Tool, ToolRegistry, COMPLETION_TOOL_NAME};
use crate::types::{RunId, RunResult, RunStatus, StreamEvent};
use crate::util::clock::{Clock, SystemClock};

use super::accumulator::OutputAccumulator;
use super::prompt::build_system_prompt;
use super::sink::UpdateSink;

/// Default step budget for an agent.
pub const DEFAULT_MAX_STEPS: u32 = 25;

/// The agent a run executes: its own instructions and step budget.
#[derive(Debug, Clone, Builder)]
pub struct AgentDefinition {
    #[builder(into, default)]
    pub system_prompt: String,
    #[builder(default = DEFAULT_MAX_STEPS)]
    pub max_steps: u32,
}

impl Default for AgentDefinition {
    fn default() -> Self {
        Self {
            system_prompt: String::new(),
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

/// Request payload to start a run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub run_id: RunId,
    pub prompt: String,
    pub agent: AgentDefinition,
    pub registry: ToolRegistry,
}

impl RunRequest {
    pub fn new(
        run_id: impl Into<RunId>,
        prompt: impl Into<String>,
        registry: ToolRegistry,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            prompt: prompt.into(),
            agent: AgentDefinition::default(),
            registry,
        }
    }

    pub fn with_agent(mut self, agent: AgentDefinition) -> Self {
        self.agent = agent;
        self
    }
}

/// Drives one model stream into a step trace, pushing a snapshot to the sink
/// after every committed change.
///
/// Events of a run are applied strictly one at a time. Separate runs share no
/// mutable state and may execute concurrently.
pub struct RunOrchestrator {
    model: Arc<dyn ModelStream>,
    clock: Arc<dyn Clock>,
}

impl RunOrchestrator {
    pub fn new(model: Arc<dyn ModelStream>) -> Self {
        Self {
            model,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Run to a terminal status.
    ///
    /// A stream `error` event ends the run `Failed` and still returns `Ok`.
    /// Unknown tools, unmatched tool results and sink failures return `Err`.
    /// The tool runtime is released on every path, including when the
    /// returned future is dropped mid-run.
    pub async fn run(&self, request: &RunRequest, sink: &dyn UpdateSink) -> Result<RunResult> {
        let run_id = &request.run_id;
        let system_prompt = build_system_prompt(&request.agent.system_prompt, self.clock.now());

        let lease = request.registry.acquire().await?;
        let mut tools: Vec<Arc<dyn Tool>> = lease.tools().to_vec();
        tools.push(Arc::new(completion_tool()));

        tracing::debug!(
            run_id = %run_id,
            tools = tools.len(),
            max_steps = request.agent.max_steps,
            "agent run start"
        );

        let stream_request = StreamRequest {
            system_prompt,
            prompt: request.prompt.clone(),
            max_steps: request.agent.max_steps,
            tools,
        };

        let mut output = OutputAccumulator::new(
            request.prompt.clone(),
            &request.registry,
            self.clock.clone(),
        );

        let mut stream = match self.model.stream(stream_request).await {
            Ok(stream) => stream,
            Err(err) => {
                let result = fail_fast(&mut output, "", &transport_error(&err), sink, run_id).await;
                lease.release();
                return result;
            }
        };

        let mut narration = String::new();
        while let Some(item) = stream.next().await {
            let event = item.unwrap_or_else(|err| StreamEvent::Error {
                error: transport_error(&err),
            });

            match event {
                StreamEvent::TextDelta { text } => {
                    // Buffered only; nothing committed, so no snapshot.
                    narration.push_str(&text);
                    continue;
                }
                StreamEvent::ToolCallStart {
                    tool_name,
                    tool_call_id,
                    args,
                } => {
                    if !narration.is_empty() {
                        output.add_text(&narration);
                        narration.clear();
                    }
                    tracing::debug!(
                        run_id = %run_id,
                        %tool_call_id,
                        %tool_name,
                        "tool call started"
                    );
                    output.start_tool_call(&tool_name, &tool_call_id, args)?;
                }
                StreamEvent::ToolCallResult {
                    tool_call_id,
                    result,
                } => {
                    tracing::debug!(run_id = %run_id, %tool_call_id, "tool call finished");
                    output.finish_tool_call(&tool_call_id, result)?;
                }
                StreamEvent::Error { error } => {
                    let result = fail_fast(&mut output, &narration, &error, sink, run_id).await;
                    lease.release();
                    return result;
                }
            }

            sink.notify(&output.build()).await?;
        }

        tracing::debug!(run_id = %run_id, "model stream exhausted");
        if !narration.is_empty() {
            output.add_text(&narration);
        }
        apply_completion_policy(&mut output);

        let result = output.build();
        tracing::info!(
            run_id = %run_id,
            status = %result.status,
            steps = result.steps.len(),
            "agent run finished"
        );
        sink.notify(&result).await?;
        lease.release();
        Ok(result)
    }

    /// Run on a separate task.
    pub fn spawn(
        self: &Arc<Self>,
        request: RunRequest,
        sink: Arc<dyn UpdateSink>,
    ) -> JoinHandle<Result<RunResult>> {
        let this = Arc::clone(self);
        tokio::spawn(async move { this.run(&request, sink.as_ref()).await })
    }
}

/// Completed iff the trace holds a completion-tool call; its input becomes the output.
fn apply_completion_policy(output: &mut OutputAccumulator<'_>) {
    let completion = output
        .steps()
        .iter()
        .filter_map(|step| step.as_tool_call())
        .find(|call| call.tool_name == COMPLETION_TOOL_NAME)
        .map(|call| call.input.clone());

    match completion {
        Some(input) => {
            output.set_status(RunStatus::Completed);
            output.set_structured_output(Some(input));
        }
        None => output.set_status(RunStatus::Failed),
    }
}

async fn fail_fast(
    output: &mut OutputAccumulator<'_>,
    narration: &str,
    error: &Value,
    sink: &dyn UpdateSink,
    run_id: &RunId,
) -> Result<RunResult> {
    let message = stream_failure_message(narration, error);
    tracing::warn!(run_id = %run_id, error = %message, "model stream reported an error");
    output.fail(Some(&message));
    let result = output.build();
    sink.notify(&result).await?;
    Ok(result)
}

/// Human-readable message for a stream failure.
///
/// Known provider error shapes yield the provider's own message; anything else
/// is the pending narration followed by the serialized error.
pub fn stream_failure_message(narration: &str, error: &Value) -> String {
    if let Some(payload) = ProviderErrorPayload::from_value(error) {
        return payload.message;
    }
    let serialized = match error {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    if narration.is_empty() {
        serialized
    } else {
        format!("{narration}\n{serialized}")
    }
}

fn transport_error(err: &AgentRunError) -> Value {
    serde_json::json!({
        "name": "StreamError",
        "message": err.to_string(),
    })
}

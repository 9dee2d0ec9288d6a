//! Per-run builder for the step trace and result snapshot.

use std::sync::Arc;

use crate::error::{AgentRunError, Result};
use crate::tools::{resolve_tool, ToolRegistry};
use crate::types::{
    append_text, transition_tool_call, RunResult, RunStatus, StepBlock, ToolCallBlock,
    ToolCallStatus,
};
use crate::util::clock::Clock;

/// In-memory state machine for one run's output.
///
/// Owned by a single orchestrator; nothing here performs I/O.
pub struct OutputAccumulator<'a> {
    registry: &'a ToolRegistry,
    clock: Arc<dyn Clock>,
    prompt: String,
    status: RunStatus,
    steps: Vec<StepBlock>,
    structured_output: Option<serde_json::Value>,
}

impl<'a> OutputAccumulator<'a> {
    pub fn new(
        prompt: impl Into<String>,
        registry: &'a ToolRegistry,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            clock,
            prompt: prompt.into(),
            status: RunStatus::InProgress,
            steps: Vec::new(),
            structured_output: None,
        }
    }

    pub fn add_text(&mut self, text: &str) {
        append_text(&mut self.steps, text);
    }

    /// Open a tool call. Fails with the resolver's error for unknown tools and
    /// with `InvariantViolation` when `tool_call_id` is already in the trace.
    pub fn start_tool_call(
        &mut self,
        tool_name: &str,
        tool_call_id: &str,
        input: serde_json::Value,
    ) -> Result<()> {
        let reused = self
            .steps
            .iter()
            .filter_map(StepBlock::as_tool_call)
            .any(|call| call.tool_call_id == tool_call_id);
        if reused {
            return Err(AgentRunError::InvariantViolation(format!(
                "tool call id '{tool_call_id}' reused within the run"
            )));
        }
        let metadata = resolve_tool(tool_name, self.registry)?;
        self.steps.push(StepBlock::ToolCall(ToolCallBlock {
            tool_call_id: tool_call_id.to_string(),
            tool_name: tool_name.to_string(),
            display_name: metadata.display_name,
            source: metadata.source,
            status: ToolCallStatus::InProgress,
            input,
            output: None,
            start_time: self.clock.now(),
            end_time: None,
        }));
        Ok(())
    }

    /// Complete an open tool call; `ToolCallNotFound` if none is open under that id.
    pub fn finish_tool_call(
        &mut self,
        tool_call_id: &str,
        output: serde_json::Value,
    ) -> Result<()> {
        let now = self.clock.now();
        transition_tool_call(&mut self.steps, tool_call_id, output, now)
    }

    /// Mark the run failed, recording `message` as narration.
    pub fn fail(&mut self, message: Option<&str>) {
        if self.status == RunStatus::Failed {
            return;
        }
        if let Some(message) = message.filter(|m| !m.is_empty()) {
            self.add_text(message);
        }
        self.status = RunStatus::Failed;
    }

    pub fn set_status(&mut self, status: RunStatus) {
        self.status = status;
    }

    pub fn set_structured_output(&mut self, value: Option<serde_json::Value>) {
        self.structured_output = value;
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn steps(&self) -> &[StepBlock] {
        &self.steps
    }

    /// All text blocks, in order, joined by newlines.
    pub fn message(&self) -> String {
        self.steps
            .iter()
            .filter_map(StepBlock::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Snapshot of the current state.
    pub fn build(&self) -> RunResult {
        RunResult {
            status: self.status,
            steps: self.steps.clone(),
            structured_output: self.structured_output.clone(),
            message: self.message(),
            prompt: self.prompt.clone(),
        }
    }
}

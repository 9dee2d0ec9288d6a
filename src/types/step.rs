//! Step trace model: narration text and tool-call blocks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{AgentRunError, Result};

/// Lifecycle of a single tool invocation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolCallStatus {
    Pending,
    InProgress,
    Completed,
}

/// Where a tool comes from, with the fields that identify it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum ToolCallSource {
    /// Built-in tool handled by the orchestrator itself.
    Internal,
    /// Action backed by an external provider package.
    Piece {
        piece_name: String,
        piece_version: String,
        action_name: String,
    },
    /// Action backed by a sub-flow.
    Flow { flow_id: String },
}

/// Model-generated narration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TextBlock {
    pub text: String,
}

/// One tool invocation and its lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallBlock {
    pub tool_call_id: String,
    pub tool_name: String,
    pub display_name: String,
    #[serde(flatten)]
    pub source: ToolCallSource,
    pub status: ToolCallStatus,
    pub input: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

/// One entry of a run's trace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StepBlock {
    Text(TextBlock),
    ToolCall(ToolCallBlock),
}

impl StepBlock {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(block) => Some(&block.text),
            Self::ToolCall(_) => None,
        }
    }

    pub fn as_tool_call(&self) -> Option<&ToolCallBlock> {
        match self {
            Self::ToolCall(block) => Some(block),
            Self::Text(_) => None,
        }
    }
}

/// Append narration: extend the last block in place if it is text, otherwise open a new one.
pub fn append_text(steps: &mut Vec<StepBlock>, text: &str) {
    if let Some(StepBlock::Text(last)) = steps.last_mut() {
        last.text.push_str(text);
        return;
    }
    steps.push(StepBlock::Text(TextBlock {
        text: text.to_string(),
    }));
}

/// Move the open tool call with `tool_call_id` to `Completed`, stamping its output and end time.
///
/// A block that is already completed is not matched, so a second transition for the
/// same id fails with [`AgentRunError::ToolCallNotFound`].
pub fn transition_tool_call(
    steps: &mut [StepBlock],
    tool_call_id: &str,
    output: serde_json::Value,
    end_time: DateTime<Utc>,
) -> Result<()> {
    let block = steps
        .iter_mut()
        .find_map(|step| match step {
            StepBlock::ToolCall(block)
                if block.tool_call_id == tool_call_id
                    && block.status != ToolCallStatus::Completed =>
            {
                Some(block)
            }
            _ => None,
        })
        .ok_or_else(|| AgentRunError::ToolCallNotFound(tool_call_id.to_string()))?;

    block.status = ToolCallStatus::Completed;
    block.output = Some(output);
    block.end_time = Some(end_time);
    Ok(())
}

//! Run identifiers, status and result snapshots.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use super::step::{StepBlock, ToolCallBlock};

/// Identifier of one agent run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RunId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RunId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Run lifecycle status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    InProgress,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Snapshot of a run's state, as handed to the update sink.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub status: RunStatus,
    pub steps: Vec<StepBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_output: Option<serde_json::Value>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub prompt: String,
}

impl RunResult {
    /// Empty in-progress result for a new run.
    pub fn started(prompt: impl Into<String>) -> Self {
        Self {
            status: RunStatus::InProgress,
            steps: Vec::new(),
            structured_output: None,
            message: String::new(),
            prompt: prompt.into(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn tool_calls(&self) -> impl Iterator<Item = &ToolCallBlock> {
        self.steps.iter().filter_map(StepBlock::as_tool_call)
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().filter_map(StepBlock::as_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_round_trips_through_strum_and_serde() {
        assert_eq!(RunStatus::InProgress.to_string(), "IN_PROGRESS");
        assert_eq!(RunStatus::from_str("FAILED").unwrap(), RunStatus::Failed);
        assert_eq!(
            serde_json::to_value(RunStatus::Completed).unwrap(),
            serde_json::json!("COMPLETED")
        );
        assert!(!RunStatus::InProgress.is_terminal());
        assert!(RunStatus::Failed.is_terminal());
    }

    #[test]
    fn started_result_is_empty_and_in_progress() {
        let result = RunResult::started("summarise my inbox");
        assert_eq!(result.status, RunStatus::InProgress);
        assert!(result.steps.is_empty());
        assert_eq!(result.prompt, "summarise my inbox");
        assert!(result.structured_output.is_none());
    }

    #[test]
    fn generated_run_ids_are_unique() {
        assert_ne!(RunId::generate(), RunId::generate());
        assert_eq!(RunId::from("run_1").to_string(), "run_1");
    }
}

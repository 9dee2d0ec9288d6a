//! Events produced by a model-stream backend.

use serde::{Deserialize, Serialize};

/// One event of a live model stream. No other kinds exist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum StreamEvent {
    /// Incremental narration.
    TextDelta { text: String },
    /// The model invoked a tool.
    ToolCallStart {
        tool_name: String,
        tool_call_id: String,
        #[serde(default)]
        args: serde_json::Value,
    },
    /// A previously started tool call returned.
    ToolCallResult {
        tool_call_id: String,
        #[serde(default)]
        result: serde_json::Value,
    },
    /// The backend reported a failure; `error` is the raw error value.
    Error { error: serde_json::Value },
}

impl StreamEvent {
    pub fn text(text: impl Into<String>) -> Self {
        Self::TextDelta { text: text.into() }
    }

    pub fn tool_call(
        tool_name: impl Into<String>,
        tool_call_id: impl Into<String>,
        args: serde_json::Value,
    ) -> Self {
        Self::ToolCallStart {
            tool_name: tool_name.into(),
            tool_call_id: tool_call_id.into(),
            args,
        }
    }

    pub fn tool_result(tool_call_id: impl Into<String>, result: serde_json::Value) -> Self {
        Self::ToolCallResult {
            tool_call_id: tool_call_id.into(),
            result,
        }
    }

    pub fn error(error: serde_json::Value) -> Self {
        Self::Error { error }
    }
}

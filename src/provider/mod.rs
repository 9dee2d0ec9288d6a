//! Model-stream backend interface.

pub mod http;

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::error::{AgentRunError, Result};
use crate::tools::Tool;
use crate::types::StreamEvent;

/// Ordered event sequence produced by a backend.
pub type EventStream = BoxStream<'static, std::result::Result<StreamEvent, AgentRunError>>;

/// Tool definition as sent to a model API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    pub fn from_tool(tool: &dyn Tool) -> Self {
        Self {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            parameters: tool.parameters().schema.clone(),
        }
    }
}

/// Everything a backend needs to start a run's stream.
#[derive(Clone)]
pub struct StreamRequest {
    pub system_prompt: String,
    pub prompt: String,
    /// Maximum number of model steps the backend may take.
    pub max_steps: u32,
    /// Callable tools; the backend executes them and reports results as events.
    pub tools: Vec<Arc<dyn Tool>>,
}

impl StreamRequest {
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|tool| ToolDefinition::from_tool(tool.as_ref()))
            .collect()
    }

    pub fn find_tool(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|tool| tool.name() == name)
    }
}

impl std::fmt::Debug for StreamRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamRequest")
            .field("system_prompt", &self.system_prompt)
            .field("prompt", &self.prompt)
            .field("max_steps", &self.max_steps)
            .field(
                "tools",
                &self.tools.iter().map(|t| t.name().to_string()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// A language-model backend that streams a tool-using session.
#[async_trait]
pub trait ModelStream: Send + Sync {
    async fn stream(&self, request: StreamRequest) -> Result<EventStream>;
}

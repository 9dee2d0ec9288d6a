//! Convenience re-exports for common use.

pub use crate::agent_loop::{
    AgentDefinition, PollOptions, RecordingSink, RunOrchestrator, RunPoller, RunRequest,
    UpdateSink,
};
pub use crate::config::AgentRunConfig;
pub use crate::error::{AgentRunError, Result};
pub use crate::provider::{EventStream, ModelStream, StreamRequest};
pub use crate::remote::{HttpRunClient, RemoteRunClient};
pub use crate::tools::{Tool, ToolRegistry, ToolRegistryEntry, COMPLETION_TOOL_NAME};
pub use crate::types::{RunId, RunResult, RunStatus, StepBlock, StreamEvent, ToolCallStatus};

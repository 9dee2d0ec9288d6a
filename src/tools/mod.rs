//! Tools: callable surface, registry catalog, and metadata resolution.

pub mod registry;
pub mod resolver;
pub mod schema;
pub mod tool;

pub use registry::{
    StaticToolRuntime, ToolEntryKind, ToolRegistry, ToolRegistryEntry, ToolRuntime,
    ToolRuntimeLease,
};
pub use resolver::{completion_tool, resolve_tool, ToolMetadata, COMPLETION_TOOL_NAME};
pub use schema::{ParameterBuilder, ToolParameters};
pub use tool::{FnTool, Tool};

//! Tool registry: the catalog of tools a run may call and the runtime backing them.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::tool::Tool;
use crate::error::Result;

/// Provenance of a registry tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum ToolEntryKind {
    /// Action from an external provider package.
    Piece {
        piece_name: String,
        piece_version: String,
        action_name: String,
    },
    /// Action that runs a sub-flow.
    Flow {
        #[serde(default)]
        flow_id: Option<String>,
        #[serde(default)]
        display_name: Option<String>,
    },
}

/// One catalog entry, looked up by exact `tool_name`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ToolRegistryEntry {
    pub tool_name: String,
    #[serde(flatten)]
    pub kind: ToolEntryKind,
}

impl ToolRegistryEntry {
    pub fn piece(
        tool_name: impl Into<String>,
        piece_name: impl Into<String>,
        piece_version: impl Into<String>,
        action_name: impl Into<String>,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            kind: ToolEntryKind::Piece {
                piece_name: piece_name.into(),
                piece_version: piece_version.into(),
                action_name: action_name.into(),
            },
        }
    }

    pub fn flow(
        tool_name: impl Into<String>,
        flow_id: Option<String>,
        display_name: Option<String>,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            kind: ToolEntryKind::Flow {
                flow_id,
                display_name,
            },
        }
    }
}

/// The concrete implementations behind the registry.
///
/// `open` is called once per run; every successful `open` is paired with
/// exactly one `close`, on every exit path of the run.
#[async_trait]
pub trait ToolRuntime: Send + Sync {
    /// Acquire the runtime and return the callable tools it provides.
    async fn open(&self) -> Result<Vec<Arc<dyn Tool>>>;

    /// Release whatever `open` acquired.
    fn close(&self);
}

/// Runtime over a fixed in-memory tool list. Closing is a no-op.
#[derive(Default)]
pub struct StaticToolRuntime {
    tools: Vec<Arc<dyn Tool>>,
}

impl StaticToolRuntime {
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Self {
        Self { tools }
    }
}

#[async_trait]
impl ToolRuntime for StaticToolRuntime {
    async fn open(&self) -> Result<Vec<Arc<dyn Tool>>> {
        Ok(self.tools.clone())
    }

    fn close(&self) {}
}

/// Read-only tool catalog plus the runtime that executes its tools.
#[derive(Clone)]
pub struct ToolRegistry {
    entries: Vec<ToolRegistryEntry>,
    runtime: Arc<dyn ToolRuntime>,
}

impl ToolRegistry {
    pub fn new(entries: Vec<ToolRegistryEntry>, runtime: Arc<dyn ToolRuntime>) -> Self {
        Self { entries, runtime }
    }

    /// Registry with no callable implementations, only metadata.
    pub fn from_entries(entries: Vec<ToolRegistryEntry>) -> Self {
        Self::new(entries, Arc::new(StaticToolRuntime::default()))
    }

    pub fn entries(&self) -> &[ToolRegistryEntry] {
        &self.entries
    }

    /// Exact-match lookup by tool name.
    pub fn find(&self, tool_name: &str) -> Option<&ToolRegistryEntry> {
        self.entries.iter().find(|entry| entry.tool_name == tool_name)
    }

    /// Open the tool runtime for the duration of a run.
    ///
    /// The returned lease releases the runtime when dropped.
    pub async fn acquire(&self) -> Result<ToolRuntimeLease> {
        let tools = self.runtime.open().await?;
        Ok(ToolRuntimeLease {
            runtime: self.runtime.clone(),
            tools,
            released: false,
        })
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("entries", &self.entries)
            .field("runtime", &"..")
            .finish()
    }
}

/// Scoped hold on an opened [`ToolRuntime`].
pub struct ToolRuntimeLease {
    runtime: Arc<dyn ToolRuntime>,
    tools: Vec<Arc<dyn Tool>>,
    released: bool,
}

impl ToolRuntimeLease {
    /// Callable surface handed to the model stream.
    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    /// Release now instead of at drop.
    pub fn release(mut self) {
        self.close_once();
    }

    fn close_once(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.tools.clear();
        self.runtime.close();
        tracing::debug!("tool runtime released");
    }
}

impl Drop for ToolRuntimeLease {
    fn drop(&mut self) {
        self.close_once();
    }
}

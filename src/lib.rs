//! agentrun: agent run orchestration.
//!
//! Turns a live model stream into an ordered, inspectable step trace: narration
//! text and tool calls with their lifecycle, plus a terminal status and
//! structured output. Runs executing out of process can be followed with the
//! polling fallback instead.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use agentrun::prelude::*;
//!
//! # async fn example(model: Arc<dyn ModelStream>) -> agentrun::error::Result<()> {
//! let registry = ToolRegistry::from_entries(vec![
//!     ToolRegistryEntry::piece("gmail_send", "@pieces/gmail", "0.3.1", "send_email"),
//! ]);
//! let request = RunRequest::new("run_1", "Email Bob the weekly report", registry);
//! let sink = RecordingSink::new();
//!
//! let result = RunOrchestrator::new(model).run(&request, &sink).await?;
//! println!("{} after {} steps", result.status, result.steps.len());
//! # Ok(())
//! # }
//! ```

pub mod agent_loop;
pub mod config;
pub mod error;
pub mod prelude;
pub mod provider;
pub mod remote;
pub mod tools;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;

//! Agent run loop: accumulator, orchestrator, sinks and the polling fallback.

pub mod accumulator;
pub mod polling;
pub mod prompt;
pub mod runner;
pub mod sink;

pub use accumulator::OutputAccumulator;
pub use polling::{poll_run, PollOptions, RunPoller, DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL};
pub use prompt::build_system_prompt;
pub use runner::{AgentDefinition, RunOrchestrator, RunRequest, DEFAULT_MAX_STEPS};
pub use sink::{FnUpdateSink, RecordingSink, UpdateSink};

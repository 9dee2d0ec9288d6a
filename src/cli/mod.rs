//! CLI entry point for agentrun.

use clap::{Parser, Subcommand};

/// agentrun CLI
#[derive(Parser, Debug)]
#[command(name = "agentrun", version, about = "Follow and inspect agent runs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll a remote run until it finishes
    Poll(PollArgs),
}

/// Arguments for `agentrun poll`.
#[derive(Parser, Debug)]
pub struct PollArgs {
    /// Run identifier
    pub run_id: String,

    /// Base URL of the run service (overrides AGENTRUN_BASE_URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Milliseconds between polls
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Maximum number of polls
    #[arg(long)]
    pub max_attempts: Option<u32>,
}

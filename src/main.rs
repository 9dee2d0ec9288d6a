//! agentrun CLI binary entry point.

use std::sync::Arc;

use agentrun::agent_loop::{FnUpdateSink, RunPoller};
use agentrun::cli::{Cli, Commands, PollArgs};
use agentrun::config::AgentRunConfig;
use agentrun::types::{RunId, RunResult};
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Poll(args) => handle_poll(args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn handle_poll(args: PollArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AgentRunConfig::from_env()?;
    if let Some(url) = args.base_url {
        config.remote_base_url = Some(url);
    }
    if let Some(ms) = args.interval_ms {
        config.poll_interval_ms = ms;
    }
    if let Some(attempts) = args.max_attempts {
        config.poll_max_attempts = attempts;
    }

    let client = config.http_run_client()?;
    let poller = RunPoller::new(Arc::new(client)).with_options(config.poll_options());
    let sink = FnUpdateSink::new(|snapshot: RunResult| async move {
        eprintln!("[{}] {} steps", snapshot.status, snapshot.steps.len());
        Ok(())
    });

    let result = poller.poll(&RunId::new(args.run_id), &sink).await?;
    if !result.is_terminal() {
        eprintln!("warning: run did not reach a terminal status within the poll budget");
    }
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

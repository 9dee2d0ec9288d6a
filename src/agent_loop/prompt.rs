//! System prompt assembly.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::tools::COMPLETION_TOOL_NAME;

/// Prepend the fixed run instructions to an agent's own system prompt.
///
/// The preamble requires the completion tool call and pins the current UTC
/// time so the model can resolve relative dates.
pub fn build_system_prompt(agent_instructions: &str, now: DateTime<Utc>) -> String {
    let timestamp = now.to_rfc3339_opts(SecondsFormat::Secs, true);
    let date = now.format("%A, %B %-d, %Y");
    let mut prompt = format!(
        "You are an autonomous assistant working towards the user's goal step by step.\n\
         You MUST always finish by calling the `{COMPLETION_TOOL_NAME}` tool: \
         pass success=true with the result when the goal is achieved, or \
         success=false with an explanation when it cannot be achieved.\n\
         \n\
         Current date and time (UTC): {timestamp} ({date}).\n\
         Use it to interpret relative time expressions such as \"today\", \
         \"tomorrow\" or \"this week\"."
    );
    let instructions = agent_instructions.trim();
    if !instructions.is_empty() {
        prompt.push_str("\n\n---\n\n");
        prompt.push_str(instructions);
    }
    prompt
}

//! Tool metadata resolution and the built-in completion tool.

use serde_json::Value;

use super::registry::{ToolEntryKind, ToolRegistry};
use super::schema::ToolParameters;
use super::tool::FnTool;
use crate::error::{AgentRunError, Result};
use crate::types::ToolCallSource;

/// Reserved name of the tool the model must call to end a run.
pub const COMPLETION_TOOL_NAME: &str = "mark_as_complete";

const COMPLETION_DISPLAY_NAME: &str = "Mark as Complete";
const UNTITLED_FLOW_DISPLAY_NAME: &str = "Untitled flow";

/// Descriptive fields of a tool-call block, derived from the tool name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolMetadata {
    pub display_name: String,
    pub source: ToolCallSource,
}

/// Resolve the metadata for a tool invocation.
///
/// The completion sentinel resolves without a registry lookup. Any other name
/// must be in the registry, otherwise the model called a tool it was not offered.
pub fn resolve_tool(tool_name: &str, registry: &ToolRegistry) -> Result<ToolMetadata> {
    if tool_name == COMPLETION_TOOL_NAME {
        return Ok(ToolMetadata {
            display_name: COMPLETION_DISPLAY_NAME.to_string(),
            source: ToolCallSource::Internal,
        });
    }

    let entry = registry
        .find(tool_name)
        .ok_or_else(|| AgentRunError::ToolNotFound(tool_name.to_string()))?;

    match &entry.kind {
        ToolEntryKind::Piece {
            piece_name,
            piece_version,
            action_name,
        } => Ok(ToolMetadata {
            display_name: format!("{piece_name}: {action_name}"),
            source: ToolCallSource::Piece {
                piece_name: piece_name.clone(),
                piece_version: piece_version.clone(),
                action_name: action_name.clone(),
            },
        }),
        ToolEntryKind::Flow {
            flow_id,
            display_name,
        } => {
            let flow_id = flow_id.clone().ok_or_else(|| {
                AgentRunError::InvariantViolation(format!(
                    "flow tool '{tool_name}' has no flow id"
                ))
            })?;
            Ok(ToolMetadata {
                display_name: display_name
                    .clone()
                    .unwrap_or_else(|| UNTITLED_FLOW_DISPLAY_NAME.to_string()),
                source: ToolCallSource::Flow { flow_id },
            })
        }
    }
}

/// The completion tool offered to the model alongside the registry tools.
///
/// Executing it checks `success` and echoes the input; the orchestrator reads
/// the call's input from the trace.
pub fn completion_tool() -> FnTool {
    FnTool::new(
        COMPLETION_TOOL_NAME,
        "Call this when the goal has been achieved or cannot be achieved. \
         Set success accordingly and put any structured result in output.",
        ToolParameters::object()
            .boolean("success", "Whether the goal was achieved", true)
            .object("output", "Structured result of the task", false)
            .string("message", "Short summary for the user", false)
            .build(),
        |input: Value| async move {
            if !input.get("success").is_some_and(Value::is_boolean) {
                return Err(AgentRunError::InvalidArgument(format!(
                    "{COMPLETION_TOOL_NAME} requires a boolean `success`"
                )));
            }
            Ok(input)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::registry::ToolRegistryEntry;
    use crate::tools::Tool;
    use serde_json::json;

    fn registry() -> ToolRegistry {
        ToolRegistry::from_entries(vec![
            ToolRegistryEntry::piece("gmail_send", "@pieces/gmail", "0.3.1", "send_email"),
            ToolRegistryEntry::flow("triage", Some("flow_1".into()), Some("Triage inbox".into())),
            ToolRegistryEntry::flow("unnamed", Some("flow_2".into()), None),
            ToolRegistryEntry::flow("broken", None, Some("Broken".into())),
        ])
    }

    #[test]
    fn completion_sentinel_needs_no_registry() {
        let meta = resolve_tool(COMPLETION_TOOL_NAME, &ToolRegistry::from_entries(vec![])).unwrap();
        assert_eq!(meta.source, ToolCallSource::Internal);
        assert_eq!(meta.display_name, "Mark as Complete");
    }

    #[test]
    fn piece_tool_copies_identifying_fields() {
        let meta = resolve_tool("gmail_send", &registry()).unwrap();
        assert_eq!(
            meta.source,
            ToolCallSource::Piece {
                piece_name: "@pieces/gmail".into(),
                piece_version: "0.3.1".into(),
                action_name: "send_email".into(),
            }
        );
        assert_eq!(meta.display_name, "@pieces/gmail: send_email");
    }

    #[test]
    fn flow_tool_uses_configured_or_placeholder_name() {
        let named = resolve_tool("triage", &registry()).unwrap();
        assert_eq!(named.display_name, "Triage inbox");
        assert_eq!(named.source, ToolCallSource::Flow { flow_id: "flow_1".into() });

        let unnamed = resolve_tool("unnamed", &registry()).unwrap();
        assert_eq!(unnamed.display_name, "Untitled flow");
    }

    #[test]
    fn flow_without_id_is_an_invariant_violation() {
        let err = resolve_tool("broken", &registry()).unwrap_err();
        assert!(matches!(err, AgentRunError::InvariantViolation(_)));
    }

    #[test]
    fn unknown_tool_is_not_found() {
        let err = resolve_tool("delete_everything", &registry()).unwrap_err();
        assert!(matches!(err, AgentRunError::ToolNotFound(name) if name == "delete_everything"));
    }

    #[tokio::test]
    async fn completion_tool_echoes_arguments() {
        let tool = completion_tool();
        let args = json!({ "success": true, "output": { "ok": true } });
        let out = tool.execute(args.clone()).await.unwrap();
        assert_eq!(tool.name(), COMPLETION_TOOL_NAME);
        assert_eq!(out, args);
    }

    #[tokio::test]
    async fn completion_tool_requires_boolean_success() {
        let err = completion_tool()
            .execute(json!({ "success": "yes" }))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentRunError::InvalidArgument(_)));
    }
}

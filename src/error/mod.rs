//! Error types for agent runs.

pub mod provider;

pub use provider::ProviderErrorPayload;

use thiserror::Error;

/// Primary error type for all agent-run operations.
#[derive(Error, Debug)]
pub enum AgentRunError {
    /// The model invoked a tool that is neither the completion sentinel nor in the registry.
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// No open tool call matches the id (finish without start, or finished twice).
    #[error("Tool call not found: {0}")]
    ToolCallNotFound(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Update sink error: {0}")]
    Sink(String),
}

/// Broad error category used for routing and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Model, registry or stream backend broke the expected protocol.
    Integration,
    Api,
    Network,
    Configuration,
    Serialization,
    Sink,
    Unknown,
}

impl AgentRunError {
    /// Create an API error from a status code and body text.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ToolNotFound(_) | Self::ToolCallNotFound(_) | Self::InvariantViolation(_) => {
                ErrorCategory::Integration
            }
            Self::Api { .. } => ErrorCategory::Api,
            Self::Network(_) => ErrorCategory::Network,
            Self::Configuration(_) | Self::InvalidArgument(_) => ErrorCategory::Configuration,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::Sink(_) => ErrorCategory::Sink,
            Self::Stream(_) => ErrorCategory::Unknown,
        }
    }

    /// Whether this error reflects a protocol violation that must abort the run.
    pub fn is_fatal(&self) -> bool {
        matches!(self.category(), ErrorCategory::Integration)
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, AgentRunError>;

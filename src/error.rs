//! Error types for Quoteloop
//!
//! Centralized error handling using thiserror. Unknown-tool and tool-execution
//! failures never leave the agent loop: their `Display` text is what the
//! reasoning engine sees as the next observation.

use thiserror::Error;

use crate::llm::LlmError;

/// All error types that can occur in Quoteloop
#[derive(Debug, Error)]
pub enum QuoteloopError {
    /// A tool with this name is already registered
    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),

    /// Tool names must be non-empty
    #[error("Invalid tool name: {0:?}")]
    InvalidToolName(String),

    /// The reasoning engine asked for a tool that is not registered
    #[error("{name} is not a valid tool, try one of [{}]", .available.join(", "))]
    UnknownTool { name: String, available: Vec<String> },

    /// A tool returned an error or panicked
    #[error("Tool error ({tool}): {message}")]
    ToolExecution { tool: String, message: String },

    /// Prompt template failed to register or render
    #[error("Template error: {0}")]
    Template(String),

    /// Caller passed an unusable argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// LLM API error
    #[error("LLM error: {0}")]
    Llm(String),

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<LlmError> for QuoteloopError {
    fn from(err: LlmError) -> Self {
        QuoteloopError::Llm(err.to_string())
    }
}

/// Result type alias for Quoteloop operations
pub type Result<T> = std::result::Result<T, QuoteloopError>;

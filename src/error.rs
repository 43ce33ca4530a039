//! Error taxonomy for the agent loop and its collaborators.
//!
//! Errors fall into two classes with different handling:
//! - Errors local to one tool call (`UnknownTool`, `InvalidArguments`,
//!   `ToolExecution`) are absorbed back into the conversation as tool-result
//!   text so the model can adapt.
//! - Errors in the model client or the loop itself (`ModelUnavailable`,
//!   `LoopExhausted`, `EmptyReply`) are fatal for the current request and
//!   surfaced to the API caller as a structured error.

use thiserror::Error;

use crate::llm::ChatMessage;

#[derive(Debug, Error)]
pub enum AgentError {
    /// A credential needed for the selected provider is missing.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The remote LLM endpoint is unreachable or rejected the request.
    #[error("model endpoint unavailable: {0}")]
    ModelUnavailable(String),

    /// The model requested a tool that is not registered.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// The model supplied arguments that fail the tool's schema.
    #[error("invalid arguments for tool '{tool}': {reason}")]
    InvalidArguments { tool: String, reason: String },

    /// The underlying tool call failed.
    #[error("tool '{tool}' failed: {source}")]
    ToolExecution {
        tool: String,
        #[source]
        source: anyhow::Error,
    },

    /// The loop hit the configured maximum number of model invocations.
    /// The partial conversation is retained for diagnostics.
    #[error("agent loop exhausted after {turns} model invocations")]
    LoopExhausted {
        turns: usize,
        conversation: Vec<ChatMessage>,
    },

    /// The model returned neither text nor tool calls.
    #[error("model returned an empty reply")]
    EmptyReply,
}

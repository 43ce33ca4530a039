//! Incremental events emitted by the streaming path.
//!
//! The serialized shape is the streaming wire contract: one JSON object per
//! SSE `data:` frame, tagged by `type`. Previews are truncated for the
//! stream; the full text still goes into the conversation.

use serde::Serialize;

use crate::tools::truncate_text;

/// Maximum length of the stringified arguments in a `tool_call` frame.
pub const ARGS_PREVIEW_LEN: usize = 200;

/// Maximum length of the content in a `tool_result` frame.
pub const RESULT_PREVIEW_LEN: usize = 500;

/// One unit of loop progress, emitted in strict chronological order.
/// Nothing follows a `Done` or `Error` event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    /// A tool execution is starting.
    ToolCall { tool: String, args: String },
    /// A tool execution finished; `content` is a bounded preview.
    ToolResult { tool: String, content: String },
    /// The final answer.
    Response { content: String },
    /// The loop terminated normally.
    Done,
    /// The loop failed; the request produces no answer.
    Error { content: String },
}

impl AgentEvent {
    pub fn tool_call(tool: impl Into<String>, args: &serde_json::Value) -> Self {
        AgentEvent::ToolCall {
            tool: tool.into(),
            args: truncate_text(&args.to_string(), ARGS_PREVIEW_LEN),
        }
    }

    pub fn tool_result(tool: impl Into<String>, content: &str) -> Self {
        AgentEvent::ToolResult {
            tool: tool.into(),
            content: truncate_text(content, RESULT_PREVIEW_LEN),
        }
    }
}

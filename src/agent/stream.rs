//! Streaming adapter: the same loop, delivered as incremental events.
//!
//! Dropping the returned stream cancels the generator at its next await
//! point, which aborts any remaining tool executions for the current turn.
//! The conversation needs no rollback since it is discarded with the
//! request.

use futures::Stream;

use super::agent_loop::{Agent, LoopEvent};
use super::events::AgentEvent;

impl Agent {
    /// Run the loop, emitting one [`AgentEvent`] per observable transition:
    /// `tool_call` before each execution, `tool_result` after it, then
    /// `response` followed by `done` (or `error` on fatal failure).
    pub fn run_stream(&self, question: &str) -> impl Stream<Item = AgentEvent> {
        let mut driver = self.driver(question);

        async_stream::stream! {
            loop {
                match driver.next_step().await {
                    Ok(Some(LoopEvent::ToolCallStarted { tool, args })) => {
                        yield AgentEvent::tool_call(tool, &args);
                    }
                    Ok(Some(LoopEvent::ToolResult { tool, content })) => {
                        yield AgentEvent::tool_result(tool, &content);
                    }
                    Ok(Some(LoopEvent::FinalAnswer { text })) => {
                        yield AgentEvent::Response { content: text };
                        yield AgentEvent::Done;
                        break;
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!(error = %e, "agent loop failed during streaming");
                        yield AgentEvent::Error {
                            content: e.to_string(),
                        };
                        break;
                    }
                }
            }
        }
    }
}

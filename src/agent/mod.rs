//! Agent module - the core travel-planning agent logic.
//!
//! The agent follows a "tools in a loop" (ReAct) pattern:
//! 1. Seed the conversation with the system prompt and the user's question
//! 2. Call the LLM with the available travel tools
//! 3. If the LLM requests tool calls, execute them in order and feed results back
//! 4. Repeat until the LLM produces a final itinerary or the turn limit is hit

mod agent_loop;
mod events;
mod prompt;
mod stream;

pub use agent_loop::{Agent, AgentOutcome};
pub use events::AgentEvent;
pub use prompt::SYSTEM_PROMPT;

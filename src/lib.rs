//! # Trip Planner
//!
//! An agentic AI travel planner exposed over HTTP.
//!
//! This library provides:
//! - An HTTP API with blocking and streaming (SSE) query endpoints
//! - A ReAct-style agent loop that interleaves LLM calls with tool execution
//! - Travel lookup tools: weather, place search, currency conversion, budget math
//! - Chat-completions access to Google Gemini and Groq
//!
//! ## Architecture
//!
//! The agent follows the "tools in a loop" pattern:
//! 1. Receive a travel question via the API
//! 2. Seed the conversation with the system prompt and the question
//! 3. Call the LLM, execute any requested tool calls, feed results back
//! 4. Repeat until the LLM produces a final Markdown itinerary
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use trip_planner::{agent::Agent, config::Config, llm::Provider, tools::ToolRegistry};
//!
//! let config = Config::from_env()?;
//! let tools = Arc::new(ToolRegistry::travel_tools());
//! let agent = Agent::new(&config, Provider::Google, tools)?;
//! let outcome = agent.run("Plan a 3-day trip to Goa").await?;
//! println!("{}", outcome.answer);
//! ```

pub mod agent;
pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod tools;

pub use config::Config;
pub use error::AgentError;

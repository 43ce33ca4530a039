//! HTTP client for OpenAI-compatible chat-completions endpoints.
//!
//! Google Gemini and Groq both expose the OpenAI wire protocol, so a single
//! client parameterized by base URL and API key covers both providers.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{ChatMessage, ChatResponse, LlmClient, Provider, ToolCall};
use crate::error::AgentError;

const GOOGLE_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Overall timeout for one completion call.
const COMPLETION_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct ChatCompletionsClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl ChatCompletionsClient {
    /// Create a client for the given provider.
    pub fn new(provider: Provider, api_key: String) -> Self {
        let base_url = match provider {
            Provider::Google => GOOGLE_BASE_URL.to_string(),
            Provider::Groq => GROQ_BASE_URL.to_string(),
        };
        Self::with_base_url(base_url, api_key)
    }

    /// Create a client against an arbitrary base URL (used in tests).
    pub fn with_base_url(base_url: impl Into<String>, api_key: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(COMPLETION_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            base_url: base_url.into(),
            api_key,
            http,
        }
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct CompletionBody {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCall>>,
}

#[async_trait]
impl LlmClient for ChatCompletionsClient {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: Option<&[Value]>,
    ) -> Result<ChatResponse, AgentError> {
        let mut body = json!({
            "model": model,
            "messages": messages,
            "temperature": 0,
        });
        if let Some(tools) = tools {
            if !tools.is_empty() {
                body["tools"] = Value::Array(tools.to_vec());
            }
        }

        let response = self
            .http
            .post(self.chat_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::ModelUnavailable(format!("request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AgentError::ModelUnavailable(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            // Prefer the API's own error message when the body carries one
            let detail = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| {
                    v.pointer("/error/message")
                        .and_then(|m| m.as_str())
                        .map(|s| s.to_string())
                })
                .unwrap_or(text);
            return Err(AgentError::ModelUnavailable(format!(
                "HTTP {}: {}",
                status, detail
            )));
        }

        let parsed: CompletionBody = serde_json::from_str(&text)
            .map_err(|e| AgentError::ModelUnavailable(format!("malformed response: {}", e)))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::ModelUnavailable("response contained no choices".into()))?;

        tracing::debug!(
            model,
            has_tool_calls = choice.message.tool_calls.is_some(),
            "chat completion received"
        );

        Ok(ChatResponse {
            content: choice.message.content,
            tool_calls: choice.message.tool_calls,
        })
    }
}

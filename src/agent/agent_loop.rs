//! Core agent loop implementation.
//!
//! The loop is an explicit two-state machine plus one terminal state:
//! `AwaitingModel -> Answered`, or `AwaitingModel -> ExecutingTools ->
//! AwaitingModel`. Both the blocking and streaming paths pull micro-steps
//! from the same [`LoopDriver`], so their observable behavior can only
//! differ in delivery, never in semantics.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::AgentError;
use crate::llm::{
    ChatCompletionsClient, ChatMessage, LlmClient, Provider, ToolCall,
};
use crate::tools::ToolRegistry;

use super::prompt::SYSTEM_PROMPT;

/// The travel-planning agent for one provider. Cheap to construct per
/// request; the registry and client are shared immutably once built.
pub struct Agent {
    llm: Arc<dyn LlmClient>,
    tools: Arc<ToolRegistry>,
    model: String,
    max_iterations: usize,
    tool_timeout: Duration,
}

/// The result of one blocking loop run.
#[derive(Debug)]
pub struct AgentOutcome {
    /// The final Markdown answer.
    pub answer: String,
    /// The full conversation, for diagnostics. Discarded with the request.
    pub conversation: Vec<ChatMessage>,
}

impl Agent {
    /// Create an agent backed by the given provider's hosted model.
    ///
    /// # Errors
    ///
    /// Returns `AgentError::Configuration` if the provider's API key is not
    /// configured.
    pub fn new(
        config: &Config,
        provider: Provider,
        tools: Arc<ToolRegistry>,
    ) -> Result<Self, AgentError> {
        let (api_key, model) = match provider {
            Provider::Google => (&config.google_api_key, &config.google_model),
            Provider::Groq => (&config.groq_api_key, &config.groq_model),
        };
        let api_key = api_key.clone().ok_or_else(|| {
            AgentError::Configuration(format!("API key for provider '{}' is not set", provider))
        })?;

        Ok(Self {
            llm: Arc::new(ChatCompletionsClient::new(provider, api_key)),
            tools,
            model: model.clone(),
            max_iterations: config.max_iterations,
            tool_timeout: Duration::from_secs(config.tool_timeout_secs),
        })
    }

    /// Create an agent from explicit collaborators. This is the seam used by
    /// tests to substitute scripted model clients and registries.
    pub fn with_parts(
        llm: Arc<dyn LlmClient>,
        tools: Arc<ToolRegistry>,
        model: impl Into<String>,
        max_iterations: usize,
    ) -> Self {
        Self {
            llm,
            tools,
            model: model.into(),
            max_iterations,
            tool_timeout: Duration::from_secs(15),
        }
    }

    /// Override the per-call tool timeout.
    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = timeout;
        self
    }

    pub(super) fn driver(&self, question: &str) -> LoopDriver {
        LoopDriver::new(
            Arc::clone(&self.llm),
            Arc::clone(&self.tools),
            self.model.clone(),
            self.max_iterations,
            self.tool_timeout,
            question,
        )
    }

    /// Run the loop to completion and return the final answer.
    pub async fn run(&self, question: &str) -> Result<AgentOutcome, AgentError> {
        let mut driver = self.driver(question);
        let answer = loop {
            match driver.next_step().await? {
                Some(LoopEvent::FinalAnswer { text }) => break text,
                Some(_) => continue,
                None => return Err(AgentError::EmptyReply),
            }
        };
        Ok(AgentOutcome {
            answer,
            conversation: driver.into_conversation(),
        })
    }
}

/// Observable transitions of the loop, consumed by both paths.
#[derive(Debug, Clone)]
pub(super) enum LoopEvent {
    /// About to execute one requested tool call.
    ToolCallStarted {
        tool: String,
        args: serde_json::Value,
    },
    /// One tool call finished (result or captured error text).
    ToolResult { tool: String, content: String },
    /// The model produced a terminal reply.
    FinalAnswer { text: String },
}

/// What `next_step` does next, resolved before any await.
enum Action {
    CallModel,
    Announce(ToolCall),
    Execute(ToolCall),
}

enum LoopState {
    /// Next step invokes the model with the full conversation.
    AwaitingModel,
    /// Requested tool calls are executed sequentially, in emission order.
    ExecutingTools {
        pending: VecDeque<ToolCall>,
        current_announced: bool,
    },
    /// Terminal: the answer has been produced.
    Answered,
}

/// Drives one conversation through the state machine, one observable event
/// per call to [`LoopDriver::next_step`].
pub(super) struct LoopDriver {
    llm: Arc<dyn LlmClient>,
    tools: Arc<ToolRegistry>,
    model: String,
    tool_schemas: Vec<serde_json::Value>,
    conversation: Vec<ChatMessage>,
    state: LoopState,
    model_invocations: usize,
    max_invocations: usize,
    tool_timeout: Duration,
}

impl LoopDriver {
    fn new(
        llm: Arc<dyn LlmClient>,
        tools: Arc<ToolRegistry>,
        model: String,
        max_invocations: usize,
        tool_timeout: Duration,
        question: &str,
    ) -> Self {
        let tool_schemas = tools.openai_schemas();
        let conversation = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(question),
        ];
        Self {
            llm,
            tools,
            model,
            tool_schemas,
            conversation,
            state: LoopState::AwaitingModel,
            model_invocations: 0,
            max_invocations,
            tool_timeout,
        }
    }

    pub(super) fn into_conversation(self) -> Vec<ChatMessage> {
        self.conversation
    }

    /// Advance to the next observable event. Returns `Ok(None)` once the
    /// loop has answered.
    pub(super) async fn next_step(&mut self) -> Result<Option<LoopEvent>, AgentError> {
        loop {
            // Decide the next action first so no state borrow lives across
            // an await point.
            let action = match &mut self.state {
                LoopState::Answered => return Ok(None),
                LoopState::AwaitingModel => Action::CallModel,
                LoopState::ExecutingTools {
                    pending,
                    current_announced,
                } => match pending.front().cloned() {
                    None => {
                        self.state = LoopState::AwaitingModel;
                        continue;
                    }
                    Some(call) if !*current_announced => {
                        *current_announced = true;
                        Action::Announce(call)
                    }
                    Some(call) => Action::Execute(call),
                },
            };

            match action {
                Action::CallModel => {
                    if self.model_invocations >= self.max_invocations {
                        return Err(AgentError::LoopExhausted {
                            turns: self.model_invocations,
                            conversation: self.conversation.clone(),
                        });
                    }
                    self.model_invocations += 1;
                    tracing::debug!(
                        invocation = self.model_invocations,
                        messages = self.conversation.len(),
                        "calling model"
                    );

                    let reply = self
                        .llm
                        .chat_completion(&self.model, &self.conversation, Some(&self.tool_schemas))
                        .await?;

                    if reply.has_tool_calls() {
                        let calls = reply.tool_calls.unwrap_or_default();
                        self.conversation
                            .push(ChatMessage::assistant(reply.content, Some(calls.clone())));
                        self.state = LoopState::ExecutingTools {
                            pending: calls.into(),
                            current_announced: false,
                        };
                        continue;
                    }

                    let text = reply.content.ok_or(AgentError::EmptyReply)?;
                    self.conversation
                        .push(ChatMessage::assistant(Some(text.clone()), None));
                    self.state = LoopState::Answered;
                    return Ok(Some(LoopEvent::FinalAnswer { text }));
                }

                Action::Announce(call) => {
                    let args = parse_arguments(&call.function.arguments);
                    return Ok(Some(LoopEvent::ToolCallStarted {
                        tool: call.function.name,
                        args,
                    }));
                }

                Action::Execute(call) => {
                    let content = self.execute_tool_call(&call).await;
                    self.conversation
                        .push(ChatMessage::tool_result(call.id.clone(), content.clone()));

                    if let LoopState::ExecutingTools {
                        pending,
                        current_announced,
                    } = &mut self.state
                    {
                        pending.pop_front();
                        *current_announced = false;
                        if pending.is_empty() {
                            self.state = LoopState::AwaitingModel;
                        }
                    }

                    return Ok(Some(LoopEvent::ToolResult {
                        tool: call.function.name,
                        content,
                    }));
                }
            }
        }
    }

    /// Execute a single tool call, converting every tool-local failure into
    /// result text the model can react to.
    async fn execute_tool_call(&self, call: &ToolCall) -> String {
        let name = &call.function.name;
        let args = parse_arguments(&call.function.arguments);

        let result = tokio::time::timeout(self.tool_timeout, self.tools.execute(name, args)).await;

        match result {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                tracing::warn!(tool = %name, error = %e, "tool call failed");
                format!("Error: {}", e)
            }
            Err(_) => {
                tracing::warn!(tool = %name, timeout = ?self.tool_timeout, "tool call timed out");
                format!(
                    "Error: tool '{}' timed out after {} seconds",
                    name,
                    self.tool_timeout.as_secs()
                )
            }
        }
    }
}

/// Parse the wire-level argument string; malformed JSON becomes `null` so
/// the registry's validation reports it back into the conversation.
fn parse_arguments(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or(serde_json::Value::Null)
}

#[cfg(test)]
pub(super) mod tests {
    use super::*;
    use crate::llm::{ChatResponse, FunctionCall, Role};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    /// A model client that replays a fixed reply script.
    pub(in crate::agent) struct ScriptedLlm {
        replies: Mutex<VecDeque<ChatResponse>>,
    }

    impl ScriptedLlm {
        pub(in crate::agent) fn new(replies: Vec<ChatResponse>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
            }
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        async fn chat_completion(
            &self,
            _model: &str,
            _messages: &[ChatMessage],
            _tools: Option<&[Value]>,
        ) -> Result<ChatResponse, AgentError> {
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| AgentError::ModelUnavailable("script exhausted".into()))
        }
    }

    /// A model client that requests the same tool forever.
    struct AlwaysToolLlm;

    #[async_trait]
    impl LlmClient for AlwaysToolLlm {
        async fn chat_completion(
            &self,
            _model: &str,
            _messages: &[ChatMessage],
            _tools: Option<&[Value]>,
        ) -> Result<ChatResponse, AgentError> {
            Ok(tool_reply(vec![call("loop", "echo", json!({"text": "again"}))]))
        }
    }

    pub(in crate::agent) struct EchoTool;

    #[async_trait]
    impl crate::tools::Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echo the input back"
        }
        fn parameters_schema(&self) -> Value {
            json!({
                "type": "object",
                "properties": { "text": { "type": "string" } },
                "required": ["text"]
            })
        }
        async fn execute(&self, args: Value) -> anyhow::Result<String> {
            Ok(format!("echo: {}", args["text"].as_str().unwrap_or("")))
        }
    }

    struct FailingTool;

    #[async_trait]
    impl crate::tools::Tool for FailingTool {
        fn name(&self) -> &str {
            "broken"
        }
        fn description(&self) -> &str {
            "Always fails"
        }
        fn parameters_schema(&self) -> Value {
            json!({"type": "object", "properties": {}})
        }
        async fn execute(&self, _args: Value) -> anyhow::Result<String> {
            anyhow::bail!("upstream service returned 503")
        }
    }

    /// Sleeps far longer than any timeout used in tests.
    struct SlowTool;

    #[async_trait]
    impl crate::tools::Tool for SlowTool {
        fn name(&self) -> &str {
            "slow"
        }
        fn description(&self) -> &str {
            "Never finishes in time"
        }
        fn parameters_schema(&self) -> Value {
            json!({"type": "object", "properties": {}})
        }
        async fn execute(&self, _args: Value) -> anyhow::Result<String> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("too late".to_string())
        }
    }

    pub(in crate::agent) fn call(id: &str, name: &str, args: Value) -> ToolCall {
        ToolCall {
            id: id.to_string(),
            call_type: "function".to_string(),
            function: FunctionCall {
                name: name.to_string(),
                arguments: args.to_string(),
            },
        }
    }

    pub(in crate::agent) fn tool_reply(calls: Vec<ToolCall>) -> ChatResponse {
        ChatResponse {
            content: None,
            tool_calls: Some(calls),
        }
    }

    pub(in crate::agent) fn final_reply(text: &str) -> ChatResponse {
        ChatResponse {
            content: Some(text.to_string()),
            tool_calls: None,
        }
    }

    pub(in crate::agent) fn test_registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);
        registry.register(FailingTool);
        registry
    }

    fn agent(llm: Arc<dyn LlmClient>, max_iterations: usize) -> Agent {
        Agent::with_parts(llm, Arc::new(test_registry()), "test-model", max_iterations)
    }

    /// Every assistant tool call must be answered by exactly one tool message
    /// (matching id, in order) before anything else follows.
    fn assert_no_dangling_calls(conversation: &[ChatMessage]) {
        let mut i = 0;
        while i < conversation.len() {
            let msg = &conversation[i];
            if msg.role == Role::Assistant {
                if let Some(calls) = &msg.tool_calls {
                    for (offset, call) in calls.iter().enumerate() {
                        let answer = conversation
                            .get(i + 1 + offset)
                            .unwrap_or_else(|| panic!("missing answer for call {}", call.id));
                        assert_eq!(answer.role, Role::Tool);
                        assert_eq!(answer.tool_call_id.as_deref(), Some(call.id.as_str()));
                    }
                    i += 1 + calls.len();
                    continue;
                }
            }
            i += 1;
        }
    }

    #[tokio::test]
    async fn tool_results_follow_emission_order() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            tool_reply(vec![
                call("call_a", "echo", json!({"text": "first"})),
                call("call_b", "echo", json!({"text": "second"})),
            ]),
            final_reply("all done"),
        ]));
        let agent = agent(llm, 10);

        let outcome = agent.run("Plan a trip").await.unwrap();
        assert_eq!(outcome.answer, "all done");

        let roles: Vec<Role> = outcome.conversation.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                Role::System,
                Role::User,
                Role::Assistant,
                Role::Tool,
                Role::Tool,
                Role::Assistant,
            ]
        );
        assert_eq!(
            outcome.conversation[3].tool_call_id.as_deref(),
            Some("call_a")
        );
        assert_eq!(
            outcome.conversation[3].content.as_deref(),
            Some("echo: first")
        );
        assert_eq!(
            outcome.conversation[4].tool_call_id.as_deref(),
            Some("call_b")
        );
        assert_no_dangling_calls(&outcome.conversation);
    }

    #[tokio::test]
    async fn loop_stops_at_max_invocations() {
        let agent = agent(Arc::new(AlwaysToolLlm), 3);

        let err = agent.run("never ends").await.unwrap_err();
        match err {
            AgentError::LoopExhausted {
                turns,
                conversation,
            } => {
                assert_eq!(turns, 3);
                // Partial conversation retained for diagnostics
                assert!(conversation.len() > 2);
                assert_no_dangling_calls(&conversation);
            }
            other => panic!("expected LoopExhausted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn tool_failure_is_absorbed_into_the_conversation() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            tool_reply(vec![call("call_1", "broken", json!({}))]),
            final_reply("recovered"),
        ]));
        let agent = agent(llm, 10);

        let outcome = agent.run("try the broken tool").await.unwrap();
        assert_eq!(outcome.answer, "recovered");

        let tool_msg = &outcome.conversation[3];
        assert_eq!(tool_msg.role, Role::Tool);
        let content = tool_msg.content.as_deref().unwrap();
        assert!(content.starts_with("Error:"));
        assert!(content.contains("503"));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_tool_times_out_and_loop_continues() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            tool_reply(vec![call("call_1", "slow", json!({}))]),
            final_reply("moved on without it"),
        ]));
        let mut registry = test_registry();
        registry.register(SlowTool);
        let agent = Agent::with_parts(llm, Arc::new(registry), "test-model", 10)
            .with_tool_timeout(Duration::from_millis(50));

        let outcome = agent.run("use the slow tool").await.unwrap();
        assert_eq!(outcome.answer, "moved on without it");

        let tool_msg = &outcome.conversation[3];
        assert_eq!(tool_msg.role, Role::Tool);
        let content = tool_msg.content.as_deref().unwrap();
        assert!(content.starts_with("Error:"));
        assert!(content.contains("timed out"));
        assert_no_dangling_calls(&outcome.conversation);
    }

    #[tokio::test]
    async fn agent_shares_the_provided_registry() {
        let config = Config::new(Some("test-key".to_string()), None);
        let tools = Arc::new(ToolRegistry::travel_tools());
        let agent = Agent::new(&config, Provider::Google, Arc::clone(&tools)).unwrap();
        assert!(Arc::ptr_eq(&agent.tools, &tools));
    }

    #[tokio::test]
    async fn unknown_tool_is_reported_not_fatal() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            tool_reply(vec![call("call_1", "teleport", json!({"to": "Goa"}))]),
            final_reply("sorry, no teleporting"),
        ]));
        let agent = agent(llm, 10);

        let outcome = agent.run("teleport me").await.unwrap();
        assert_eq!(outcome.answer, "sorry, no teleporting");

        let content = outcome.conversation[3].content.as_deref().unwrap();
        assert!(content.contains("unknown tool"));
        assert_no_dangling_calls(&outcome.conversation);
    }

    #[tokio::test]
    async fn invalid_arguments_are_reported_not_fatal() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            tool_reply(vec![call("call_1", "echo", json!({}))]),
            final_reply("asked again with the right args"),
        ]));
        let agent = agent(llm, 10);

        let outcome = agent.run("echo nothing").await.unwrap();
        let content = outcome.conversation[3].content.as_deref().unwrap();
        assert!(content.contains("invalid arguments"));
        assert!(content.contains("text"));
    }

    #[tokio::test]
    async fn model_failure_is_fatal() {
        let agent = agent(Arc::new(ScriptedLlm::new(vec![])), 10);
        let err = agent.run("anything").await.unwrap_err();
        assert!(matches!(err, AgentError::ModelUnavailable(_)));
    }

    #[tokio::test]
    async fn empty_reply_is_fatal() {
        let llm = Arc::new(ScriptedLlm::new(vec![ChatResponse::default()]));
        let agent = agent(llm, 10);
        let err = agent.run("anything").await.unwrap_err();
        assert!(matches!(err, AgentError::EmptyReply));
    }

    #[tokio::test]
    async fn conversation_is_seeded_with_system_and_user() {
        let llm = Arc::new(ScriptedLlm::new(vec![final_reply("hi")]));
        let agent = agent(llm, 10);

        let outcome = agent.run("Plan a 3-day trip to Goa").await.unwrap();
        assert_eq!(outcome.conversation[0].role, Role::System);
        assert!(outcome.conversation[0]
            .content
            .as_deref()
            .unwrap()
            .contains("Travel Agent"));
        assert_eq!(outcome.conversation[1].role, Role::User);
        assert_eq!(
            outcome.conversation[1].content.as_deref(),
            Some("Plan a 3-day trip to Goa")
        );
    }
}

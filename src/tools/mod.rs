//! Travel lookup tools available to the agent.
//!
//! Each tool is a stateless request/response function: weather and place
//! search call free read-only HTTP services, currency conversion calls a
//! live exchange-rate API, and budget math is computed locally. Tools are
//! idempotent from the loop's perspective.

mod budget;
mod currency;
mod geocode;
mod places;
mod weather;

pub use budget::{CalculateTripBudget, EstimateDailyFoodCost};
pub use currency::{ConvertCurrency, GetExchangeRate};
pub use places::{SearchHotels, SearchPlaces};
pub use weather::GetWeatherForecast;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::AgentError;

/// A tool the model may request.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The name of the tool (used in function calls)
    fn name(&self) -> &str;

    /// A description of what the tool does
    fn description(&self) -> &str;

    /// JSON Schema for the tool's parameters
    fn parameters_schema(&self) -> Value;

    /// Execute the tool with the given arguments, returning a text result
    /// that is fed back into the conversation.
    async fn execute(&self, args: Value) -> anyhow::Result<String>;
}

/// Static metadata describing one registered tool.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Fixed mapping from tool name to implementation. Registration order is
/// preserved so the advertised tool list is stable across requests.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard travel-planning tool set.
    pub fn travel_tools() -> Self {
        let mut registry = Self::new();
        registry.register(GetWeatherForecast);
        registry.register(SearchPlaces);
        registry.register(SearchHotels);
        registry.register(ConvertCurrency);
        registry.register(GetExchangeRate);
        registry.register(CalculateTripBudget);
        registry.register(EstimateDailyFoodCost);
        registry
    }

    /// Register a tool.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.tools.push(Box::new(tool));
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    /// Static metadata for every registered tool.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools
            .iter()
            .map(|t| ToolDescriptor {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters_schema(),
            })
            .collect()
    }

    /// Tool schemas in the OpenAI function-calling shape.
    pub fn openai_schemas(&self) -> Vec<Value> {
        self.tools
            .iter()
            .map(|t| {
                json!({
                    "type": "function",
                    "function": {
                        "name": t.name(),
                        "description": t.description(),
                        "parameters": t.parameters_schema(),
                    }
                })
            })
            .collect()
    }

    /// Validate and dispatch one tool call.
    pub async fn execute(&self, name: &str, args: Value) -> Result<String, AgentError> {
        let tool = self
            .get(name)
            .ok_or_else(|| AgentError::UnknownTool(name.to_string()))?;

        validate_required_args(tool, &args)?;

        tracing::debug!(tool = name, "executing tool");
        tool.execute(args)
            .await
            .map_err(|source| AgentError::ToolExecution {
                tool: name.to_string(),
                source,
            })
    }
}

/// Check that every field the tool's schema marks `required` is present.
fn validate_required_args(tool: &dyn Tool, args: &Value) -> Result<(), AgentError> {
    let schema = tool.parameters_schema();
    let required = match schema.get("required").and_then(|r| r.as_array()) {
        Some(required) if !required.is_empty() => required.clone(),
        _ => return Ok(()),
    };

    let obj = args.as_object().ok_or_else(|| AgentError::InvalidArguments {
        tool: tool.name().to_string(),
        reason: "arguments must be a JSON object".to_string(),
    })?;

    for field in required {
        if let Some(field) = field.as_str() {
            if !obj.contains_key(field) {
                return Err(AgentError::InvalidArguments {
                    tool: tool.name().to_string(),
                    reason: format!("missing required field '{}'", field),
                });
            }
        }
    }
    Ok(())
}

/// Truncate a string at a char boundary, appending a marker when cut.
pub(crate) fn truncate_text(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut idx = max;
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    format!("{}... [truncated]", &s[..idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echo the input back"
        }
        fn parameters_schema(&self) -> Value {
            json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string" }
                },
                "required": ["text"]
            })
        }
        async fn execute(&self, args: Value) -> anyhow::Result<String> {
            Ok(args["text"].as_str().unwrap_or_default().to_string())
        }
    }

    #[tokio::test]
    async fn unknown_tool_is_reported() {
        let registry = ToolRegistry::new();
        let err = registry.execute("nope", json!({})).await.unwrap_err();
        assert!(matches!(err, AgentError::UnknownTool(name) if name == "nope"));
    }

    #[tokio::test]
    async fn missing_required_argument_is_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(Echo);

        let err = registry.execute("echo", json!({})).await.unwrap_err();
        match err {
            AgentError::InvalidArguments { tool, reason } => {
                assert_eq!(tool, "echo");
                assert!(reason.contains("text"));
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let ok = registry
            .execute("echo", json!({"text": "hello"}))
            .await
            .unwrap();
        assert_eq!(ok, "hello");
    }

    #[test]
    fn travel_tools_are_registered_in_stable_order() {
        let registry = ToolRegistry::travel_tools();
        let names: Vec<String> = registry.descriptors().into_iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            vec![
                "get_weather_forecast",
                "search_places",
                "search_hotels",
                "convert_currency",
                "get_exchange_rate",
                "calculate_trip_budget",
                "estimate_daily_food_cost",
            ]
        );

        let schemas = registry.openai_schemas();
        assert_eq!(schemas.len(), 7);
        assert_eq!(schemas[0]["type"], "function");
        assert_eq!(schemas[0]["function"]["name"], "get_weather_forecast");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_text("short", 10), "short");
        let cut = truncate_text("température", 6);
        assert!(cut.starts_with("tempé") || cut.starts_with("temp"));
        assert!(cut.ends_with("... [truncated]"));
    }
}

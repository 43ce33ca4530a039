//! API request and response types.

use serde::{Deserialize, Serialize};

use crate::llm::Provider;

/// Request body for both query endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    /// The user's travel question
    pub question: String,

    /// Which hosted model answers it (defaults to `google`)
    #[serde(default)]
    pub model_provider: Provider,
}

/// Successful blocking query response.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    /// The final Markdown travel plan
    pub answer: String,
}

/// Structured error body; every failure is translated into this shape.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Current server time (RFC 3339)
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_request_defaults_to_google() {
        let req: QueryRequest =
            serde_json::from_str(r#"{"question": "Plan a weekend in Lisbon"}"#).unwrap();
        assert_eq!(req.model_provider, Provider::Google);

        let req: QueryRequest = serde_json::from_str(
            r#"{"question": "Plan a weekend in Lisbon", "model_provider": "groq"}"#,
        )
        .unwrap();
        assert_eq!(req.model_provider, Provider::Groq);
    }
}

//! HTTP handlers for the query API.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::{Stream, StreamExt};
use uuid::Uuid;

use crate::agent::Agent;
use crate::error::AgentError;

use super::types::{ErrorResponse, HealthResponse, QueryRequest, QueryResponse};
use super::AppState;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn internal_error(message: impl std::fmt::Display) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// `POST /query` - run the agent to completion and return the final answer.
pub async fn query(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    let agent = Agent::new(
        &state.config,
        request.model_provider,
        Arc::clone(&state.tools),
    )
    .map_err(internal_error)?;

    let timeout = Duration::from_secs(state.config.request_timeout_secs);
    let outcome = tokio::time::timeout(timeout, agent.run(&request.question))
        .await
        .map_err(|_| {
            tracing::warn!(timeout_secs = timeout.as_secs(), "query timed out");
            internal_error("request timed out")
        })?
        .map_err(|e| {
            if let AgentError::LoopExhausted { conversation, .. } = &e {
                tracing::error!(
                    messages = conversation.len(),
                    "agent loop exhausted; partial conversation discarded"
                );
            } else {
                tracing::error!(error = %e, "query failed");
            }
            internal_error(e)
        })?;

    Ok(Json(QueryResponse {
        answer: outcome.answer,
    }))
}

/// `POST /query/stream` - stream agent progress via Server-Sent Events.
///
/// One JSON-encoded [`AgentEvent`] per `data:` frame, terminated by a
/// `done` frame (or an `error` frame on failure).
pub async fn query_stream(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QueryRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let agent = Agent::new(
        &state.config,
        request.model_provider,
        Arc::clone(&state.tools),
    )
    .map_err(internal_error)?;

    let stream_id = Uuid::new_v4();
    tracing::info!(
        stream_id = %stream_id,
        provider = %request.model_provider,
        "query SSE stream opened"
    );

    struct StreamDropGuard {
        stream_id: Uuid,
    }

    impl Drop for StreamDropGuard {
        fn drop(&mut self) {
            tracing::info!(stream_id = %self.stream_id, "query SSE stream closed");
        }
    }

    let drop_guard = StreamDropGuard { stream_id };

    let stream = async_stream::stream! {
        let _guard = drop_guard;
        let mut events = Box::pin(agent.run_stream(&request.question));

        while let Some(event) = events.next().await {
            match Event::default().json_data(&event) {
                Ok(sse) => yield Ok(sse),
                Err(e) => {
                    tracing::error!(
                        stream_id = %stream_id,
                        error = %e,
                        "failed to serialize SSE event; dropping"
                    );
                }
            }
        }
    };

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keepalive"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_reports_ok_with_timestamp() {
        let Json(body) = health().await;
        assert_eq!(body.status, "ok");
        assert!(chrono::DateTime::parse_from_rfc3339(&body.timestamp).is_ok());
    }

    #[tokio::test]
    async fn missing_provider_key_is_a_structured_error() {
        let state = Arc::new(AppState {
            config: crate::config::Config::new(None, None),
            tools: Arc::new(crate::tools::ToolRegistry::travel_tools()),
        });
        let request = QueryRequest {
            question: "Plan a trip".to_string(),
            model_provider: crate::llm::Provider::Groq,
        };

        let err = query(State(state), Json(request)).await.unwrap_err();
        assert_eq!(err.0, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.1.error.contains("groq"));
    }
}

//! Configuration management for Trip Planner.
//!
//! Configuration can be set via environment variables (a `.env` file is
//! honored at startup):
//! - `GOOGLE_API_KEY` - API key for Google Gemini. Required only when a request selects the `google` provider.
//! - `GROQ_API_KEY` - API key for Groq. Required only when a request selects the `groq` provider.
//! - `GOOGLE_MODEL` - Optional. Gemini model name. Defaults to `gemini-2.5-flash-lite`.
//! - `GROQ_MODEL` - Optional. Groq model name. Defaults to `llama-3.3-70b-versatile`.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `8000`.
//! - `MAX_ITERATIONS` - Optional. Maximum model invocations per request. Defaults to `25`.
//! - `TOOL_TIMEOUT_SECS` - Optional. Timeout for a single tool execution. Defaults to `15`.
//! - `REQUEST_TIMEOUT_SECS` - Optional. Timeout for a full blocking query. Defaults to `120`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Server and agent configuration, constructed once at process start and
/// passed explicitly to each agent instance.
#[derive(Debug, Clone)]
pub struct Config {
    /// Google Gemini API key (OpenAI-compatible endpoint)
    pub google_api_key: Option<String>,

    /// Groq API key
    pub groq_api_key: Option<String>,

    /// Gemini model identifier
    pub google_model: String,

    /// Groq model identifier
    pub groq_model: String,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Maximum model invocations per request
    pub max_iterations: usize,

    /// Timeout for one tool execution, in seconds
    pub tool_timeout_secs: u64,

    /// Timeout for a full blocking query, in seconds
    pub request_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a numeric variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let google_api_key = std::env::var("GOOGLE_API_KEY").ok().filter(|k| !k.is_empty());
        let groq_api_key = std::env::var("GROQ_API_KEY").ok().filter(|k| !k.is_empty());

        let google_model = std::env::var("GOOGLE_MODEL")
            .unwrap_or_else(|_| "gemini-2.5-flash-lite".to_string());
        let groq_model = std::env::var("GROQ_MODEL")
            .unwrap_or_else(|_| "llama-3.3-70b-versatile".to_string());

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let max_iterations = std::env::var("MAX_ITERATIONS")
            .unwrap_or_else(|_| "25".to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("MAX_ITERATIONS".to_string(), format!("{}", e))
            })?;

        let tool_timeout_secs = std::env::var("TOOL_TIMEOUT_SECS")
            .unwrap_or_else(|_| "15".to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("TOOL_TIMEOUT_SECS".to_string(), format!("{}", e))
            })?;

        let request_timeout_secs = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("REQUEST_TIMEOUT_SECS".to_string(), format!("{}", e))
            })?;

        Ok(Self {
            google_api_key,
            groq_api_key,
            google_model,
            groq_model,
            host,
            port,
            max_iterations,
            tool_timeout_secs,
            request_timeout_secs,
        })
    }

    /// Create a config with custom keys (useful for testing).
    pub fn new(google_api_key: Option<String>, groq_api_key: Option<String>) -> Self {
        Self {
            google_api_key,
            groq_api_key,
            google_model: "gemini-2.5-flash-lite".to_string(),
            groq_model: "llama-3.3-70b-versatile".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8000,
            max_iterations: 25,
            tool_timeout_secs: 15,
            request_timeout_secs: 120,
        }
    }
}

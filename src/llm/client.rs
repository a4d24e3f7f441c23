//! Chat completion client: request assembly, bounded execution, typed output.
//!
//! Transport and provider failures are classified into `AiError` exactly
//! once here, at the HTTP boundary. Pipeline code downstream sees only the
//! typed taxonomy.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::AiConfig;
use crate::error::AiError;

use super::http::{HttpClient, HttpError};
use super::request::RequestBuilder;
use super::retry::{with_retry, RetryPolicy};
use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatCompletionResult, MessageContent,
    ResponseSchema, SamplingParameters,
};

// ──────────────────────────────────────────────
// Options
// ──────────────────────────────────────────────

/// Options for one `chat_completion` call.
#[derive(Debug, Clone)]
pub struct ChatOptions {
    pub system_message: String,
    pub user_message: MessageContent,
    pub response_schema: ResponseSchema,
    /// Overrides the client's default model when set.
    pub model: Option<String>,
    pub parameters: Option<SamplingParameters>,
}

impl ChatOptions {
    pub fn new(
        system_message: &str,
        user_message: MessageContent,
        response_schema: ResponseSchema,
    ) -> Self {
        Self {
            system_message: system_message.to_string(),
            user_message,
            response_schema,
            model: None,
            parameters: None,
        }
    }
}

// ──────────────────────────────────────────────
// Transport seam
// ──────────────────────────────────────────────

/// Seam between the client and the provider HTTP API.
///
/// Production uses `OpenAiTransport`; tests substitute an in-memory mock,
/// the same way the pipeline swaps its stores.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn execute(&self, request: &ChatCompletionRequest) -> Result<Value, HttpError>;
}

/// Bearer-authenticated transport for OpenAI-compatible providers.
pub struct OpenAiTransport {
    http: HttpClient,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl OpenAiTransport {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl ChatTransport for OpenAiTransport {
    async fn execute(&self, request: &ChatCompletionRequest) -> Result<Value, HttpError> {
        let url = format!("{}/chat/completions", self.base_url);
        let headers = [("Authorization", format!("Bearer {}", self.api_key))];
        self.http
            .post_json_timeout(&url, &headers, request, self.timeout)
            .await
    }
}

// ──────────────────────────────────────────────
// Client
// ──────────────────────────────────────────────

pub struct LlmClient {
    transport: Box<dyn ChatTransport>,
    retry: RetryPolicy,
    default_model: String,
}

impl LlmClient {
    pub fn new(transport: Box<dyn ChatTransport>, default_model: &str) -> Self {
        Self {
            transport,
            retry: RetryPolicy::default(),
            default_model: default_model.to_string(),
        }
    }

    /// Production client from configuration. Fails fast without an API key.
    pub fn from_config(config: &AiConfig) -> Result<Self, AiError> {
        let api_key = config.api_key.as_deref().ok_or_else(|| {
            AiError::Configuration("no API key configured for the AI provider".into())
        })?;
        let transport = OpenAiTransport::new(&config.base_url, api_key, config.request_timeout);
        Ok(Self::new(Box::new(transport), &config.model)
            .with_retry(RetryPolicy::new(config.max_attempts, config.base_delay)))
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Execute a structured chat completion and parse the payload as `T`.
    pub async fn chat_completion<T: DeserializeOwned>(
        &self,
        options: ChatOptions,
    ) -> Result<ChatCompletionResult<T>, AiError> {
        let mut builder = RequestBuilder::new();
        builder
            .set_model(options.model.as_deref().unwrap_or(&self.default_model))
            .add_system_message(&options.system_message)
            .add_user_content(options.user_message.clone())
            .set_response_schema(&options.response_schema);
        if let Some(parameters) = options.parameters {
            builder.set_parameters(parameters);
        }
        let request = builder.build()?;

        let started = Instant::now();
        let raw = with_retry(&self.retry, || async {
            self.transport
                .execute(&request)
                .await
                .map_err(classify_http_error)
        })
        .await?;

        let response: ChatCompletionResponse = serde_json::from_value(raw)
            .map_err(|e| AiError::Validation(format!("malformed provider response: {e}")))?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .unwrap_or_default();
        if content.is_empty() {
            return Err(AiError::Validation(
                "no content found in provider response".into(),
            ));
        }

        let data: T = serde_json::from_str(content).map_err(|e| {
            AiError::Validation(format!(
                "response does not match schema '{}': {e}",
                options.response_schema.name
            ))
        })?;

        tracing::info!(
            model = %response.model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            total_tokens = response.usage.as_ref().map(|u| u.total_tokens),
            "chat completion ok"
        );

        Ok(ChatCompletionResult {
            data,
            model: response.model,
            usage: response.usage,
        })
    }
}

/// Classify a low-level HTTP signal into the typed taxonomy.
fn classify_http_error(error: HttpError) -> AiError {
    match error {
        HttpError::Timeout(timeout) => {
            AiError::Timeout(format!("provider call exceeded {}s", timeout.as_secs()))
        }
        HttpError::Status { status, reason } => match status {
            401 | 403 => AiError::Authentication(format!("HTTP {status}: {reason}")),
            429 => AiError::RateLimit(format!("HTTP {status}: {reason}")),
            400 => AiError::Validation(format!("HTTP {status}: {reason}")),
            _ => AiError::Api {
                status,
                message: reason,
            },
        },
        HttpError::Transport(message) => AiError::Network(message),
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

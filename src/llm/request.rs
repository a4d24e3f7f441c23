//! Fluent accumulation of a chat completion request.
//!
//! No I/O. An instance can be reused across calls via `reset`.

use crate::error::AiError;

use super::types::{
    ChatCompletionRequest, ChatMessage, MessageContent, ResponseFormat, ResponseSchema, Role,
    SamplingParameters,
};

#[derive(Debug, Default)]
pub struct RequestBuilder {
    model: Option<String>,
    messages: Vec<ChatMessage>,
    response_format: Option<ResponseFormat>,
    parameters: SamplingParameters,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_model(&mut self, model: &str) -> &mut Self {
        self.model = Some(model.to_string());
        self
    }

    /// Append a system message. Multiple are allowed; order is preserved.
    pub fn add_system_message(&mut self, text: &str) -> &mut Self {
        self.messages.push(ChatMessage {
            role: Role::System,
            content: MessageContent::text(text),
        });
        self
    }

    /// Append a plain-text user message.
    pub fn add_user_message(&mut self, text: &str) -> &mut Self {
        self.messages.push(ChatMessage {
            role: Role::User,
            content: MessageContent::text(text),
        });
        self
    }

    /// Append a user message with arbitrary content, e.g. text plus an image.
    pub fn add_user_content(&mut self, content: MessageContent) -> &mut Self {
        self.messages.push(ChatMessage {
            role: Role::User,
            content,
        });
        self
    }

    /// Constrain the response to a schema via the strict provider envelope.
    pub fn set_response_schema(&mut self, schema: &ResponseSchema) -> &mut Self {
        self.response_format = Some(ResponseFormat::json_schema(
            &schema.name,
            schema.schema.clone(),
        ));
        self
    }

    /// Merge sampling parameters; only supplied fields overwrite existing ones.
    pub fn set_parameters(&mut self, parameters: SamplingParameters) -> &mut Self {
        if let Some(temperature) = parameters.temperature {
            self.parameters.temperature = Some(temperature);
        }
        if let Some(max_tokens) = parameters.max_tokens {
            self.parameters.max_tokens = Some(max_tokens);
        }
        if let Some(top_p) = parameters.top_p {
            self.parameters.top_p = Some(top_p);
        }
        self
    }

    /// Finalize the request. Requires a model and at least one message.
    pub fn build(&self) -> Result<ChatCompletionRequest, AiError> {
        let model = self
            .model
            .clone()
            .ok_or_else(|| AiError::Configuration("chat request has no model".into()))?;
        if self.messages.is_empty() {
            return Err(AiError::Configuration("chat request has no messages".into()));
        }

        Ok(ChatCompletionRequest {
            model,
            messages: self.messages.clone(),
            response_format: self.response_format.clone(),
            temperature: self.parameters.temperature,
            max_tokens: self.parameters.max_tokens,
            top_p: self.parameters.top_p,
        })
    }

    /// Clear all accumulated state so the builder can be reused.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

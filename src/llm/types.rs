//! Wire types for the OpenAI-compatible chat completions API.

use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ──────────────────────────────────────────────
// Request side
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Reference to a receipt image, either hosted or inlined.
#[derive(Debug, Clone)]
pub enum ImageRef {
    Url(String),
    DataUri { media_type: String, data: String },
}

impl ImageRef {
    /// Inline raw bytes as a base64 data URI.
    pub fn from_bytes(media_type: &str, bytes: &[u8]) -> Self {
        let data = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self::DataUri {
            media_type: media_type.to_string(),
            data,
        }
    }

    /// The string placed in the provider's `image_url` field.
    pub fn as_url(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::DataUri { media_type, data } => format!("data:{media_type};base64,{data}"),
        }
    }
}

/// Message content: plain text or a multimodal part list.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    pub fn text(text: &str) -> Self {
        Self::Text(text.to_string())
    }

    /// Text instruction paired with an image reference.
    pub fn with_image(text: &str, image: &ImageRef) -> Self {
        Self::Parts(vec![
            ContentPart::Text {
                text: text.to_string(),
            },
            ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: image.as_url(),
                },
            },
        ])
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

/// A named JSON Schema the provider must conform to.
#[derive(Debug, Clone)]
pub struct ResponseSchema {
    pub name: String,
    pub schema: Value,
}

/// Provider envelope for structured output.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
    pub json_schema: JsonSchemaSpec,
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonSchemaSpec {
    pub name: String,
    pub strict: bool,
    pub schema: Value,
}

impl ResponseFormat {
    /// Wrap a schema into the strict `json_schema` envelope.
    pub fn json_schema(name: &str, schema: Value) -> Self {
        Self {
            kind: "json_schema".to_string(),
            json_schema: JsonSchemaSpec {
                name: name.to_string(),
                strict: true,
                schema,
            },
        }
    }
}

/// Optional sampling parameters. Unset fields keep the provider defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct SamplingParameters {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f32>,
}

/// Serialized body of `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
}

// ──────────────────────────────────────────────
// Response side
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    pub model: String,
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: AssistantMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Parsed payload of a structured completion plus call metadata.
#[derive(Debug)]
pub struct ChatCompletionResult<T> {
    pub data: T,
    /// The model the provider actually used.
    pub model: String,
    pub usage: Option<TokenUsage>,
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_text_message_serializes_as_string() {
        let message = ChatMessage {
            role: Role::System,
            content: MessageContent::text("You extract receipts."),
        };
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(
            value,
            json!({"role": "system", "content": "You extract receipts."})
        );
    }

    #[test]
    fn multimodal_message_serializes_as_part_array() {
        let image = ImageRef::Url("https://files.example/receipts/u1/r.jpg".into());
        let message = ChatMessage {
            role: Role::User,
            content: MessageContent::with_image("Read this receipt.", &image),
        };
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(
            value,
            json!({
                "role": "user",
                "content": [
                    {"type": "text", "text": "Read this receipt."},
                    {"type": "image_url", "image_url": {"url": "https://files.example/receipts/u1/r.jpg"}}
                ]
            })
        );
    }

    #[test]
    fn data_uri_encodes_bytes() {
        let image = ImageRef::from_bytes("image/jpeg", b"abc");
        assert_eq!(image.as_url(), "data:image/jpeg;base64,YWJj");
    }

    #[test]
    fn response_format_wraps_schema_strictly() {
        let format = ResponseFormat::json_schema("receipt", json!({"type": "object"}));
        let value = serde_json::to_value(&format).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "json_schema",
                "json_schema": {
                    "name": "receipt",
                    "strict": true,
                    "schema": {"type": "object"}
                }
            })
        );
    }

    #[test]
    fn unset_parameters_are_omitted_from_the_body() {
        let request = ChatCompletionRequest {
            model: "gpt-4o-mini".into(),
            messages: vec![ChatMessage {
                role: Role::User,
                content: MessageContent::text("hi"),
            }],
            response_format: None,
            temperature: None,
            max_tokens: Some(512),
            top_p: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("temperature"));
        assert!(!object.contains_key("top_p"));
        assert!(!object.contains_key("response_format"));
        assert_eq!(object["max_tokens"], json!(512));
    }

    #[test]
    fn response_parses_with_and_without_usage() {
        let with_usage: ChatCompletionResponse = serde_json::from_value(json!({
            "id": "cmpl-1",
            "model": "gpt-4o-mini",
            "choices": [{"message": {"role": "assistant", "content": "{}"}}],
            "usage": {"prompt_tokens": 120, "completion_tokens": 40, "total_tokens": 160}
        }))
        .unwrap();
        assert_eq!(with_usage.usage.unwrap().total_tokens, 160);

        let without_usage: ChatCompletionResponse = serde_json::from_value(json!({
            "model": "gpt-4o-mini",
            "choices": [{"message": {"content": null}}]
        }))
        .unwrap();
        assert!(without_usage.usage.is_none());
        assert!(without_usage.choices[0].message.content.is_none());
    }
}

//! Receipt vision extraction: prompt, schema, and the LLM-side extractor.
//!
//! This is what runs behind the deployed extraction function; keeping the
//! prompt and schema next to the types they must produce makes drift between
//! the two impossible to miss.

use crate::error::AiError;
use crate::pipeline::types::ExtractedReceipt;

use super::client::{ChatOptions, LlmClient};
use super::types::{ImageRef, MessageContent, ResponseSchema, SamplingParameters};

pub const RECEIPT_SCHEMA_NAME: &str = "receipt_extraction";

pub const RECEIPT_SYSTEM_PROMPT: &str = "\
You are a receipt line-item extractor for a personal expense tracker. Your ONLY
role is to read a photographed store receipt and report what is printed on it.

RULES:
1. Extract ONLY line items visible on the receipt. Never invent items.
2. Amounts are numbers in PLN with a decimal point, e.g. 12.99.
3. For each item, guess a short category label from its name, in English
   (e.g. groceries, transport, household, pharmacy).
4. The total is the printed receipt total; if none is printed, sum the items.
5. The date is the printed purchase date as YYYY-MM-DD, or null if unreadable.
6. Skip deposit refunds, loyalty-point lines, and payment/change lines.";

const RECEIPT_USER_PROMPT: &str =
    "Extract every line item from this receipt photo into the required structure.";

/// Strict schema for the structured extraction output.
pub fn receipt_response_schema() -> ResponseSchema {
    ResponseSchema {
        name: RECEIPT_SCHEMA_NAME.to_string(),
        schema: serde_json::json!({
            "type": "object",
            "properties": {
                "items": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "amount": {"type": "number"},
                            "category": {"type": "string"}
                        },
                        "required": ["name", "amount", "category"],
                        "additionalProperties": false
                    }
                },
                "total": {"type": "number"},
                "date": {"type": ["string", "null"]}
            },
            "required": ["items", "total", "date"],
            "additionalProperties": false
        }),
    }
}

/// Vision extractor backed by a chat completion client.
pub struct ReceiptVision {
    client: LlmClient,
}

impl ReceiptVision {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }

    /// Extract structured line items from a receipt image.
    pub async fn extract(&self, image: &ImageRef) -> Result<ExtractedReceipt, AiError> {
        let options = ChatOptions {
            system_message: RECEIPT_SYSTEM_PROMPT.to_string(),
            user_message: MessageContent::with_image(RECEIPT_USER_PROMPT, image),
            response_schema: receipt_response_schema(),
            model: None,
            // Deterministic output; receipts leave no room for creativity.
            parameters: Some(SamplingParameters {
                temperature: Some(0.0),
                ..Default::default()
            }),
        };

        let result = self.client.chat_completion::<ExtractedReceipt>(options).await?;
        tracing::info!(
            model = %result.model,
            items = result.data.items.len(),
            "receipt vision extraction complete"
        );
        Ok(result.data)
    }
}

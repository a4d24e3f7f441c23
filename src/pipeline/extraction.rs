//! Remote AI invocation step, plus the production extractor.

use async_trait::async_trait;
use serde_json::json;

use crate::error::AiError;
use crate::llm::http::HttpClient;

use super::context::ProcessingContext;
use super::types::{ExtractedReceipt, ExtractorError, ReceiptExtractor};

/// Invoke the remote extraction function and stash its raw result.
pub(crate) async fn run_extraction(
    extractor: &dyn ReceiptExtractor,
    auth_token: Option<&str>,
    context: &mut ProcessingContext,
) -> Result<(), AiError> {
    let receipt = match extractor.invoke(&context.file_path, auth_token).await {
        Ok(Some(receipt)) => receipt,
        Ok(None) => {
            return Err(AiError::Validation("extraction returned no data".into()));
        }
        Err(error) => return Err(classify_extractor_error(&error)),
    };

    if receipt.items.is_empty() {
        return Err(AiError::Validation(
            "extraction found no line items on the receipt".into(),
        ));
    }

    tracing::info!(
        items = receipt.items.len(),
        total = receipt.total,
        "receipt extraction returned"
    );
    context.raw_receipt = Some(receipt);
    Ok(())
}

/// The remote function reports failures as text. Recognize the two
/// conditions a user can act on; wrap the rest.
fn classify_extractor_error(error: &ExtractorError) -> AiError {
    let message = error.0.to_lowercase();

    if message.contains("rate limit")
        || message.contains("http 429")
        || message.contains("too many requests")
    {
        AiError::RateLimit("extraction service is rate limited".into())
    } else if message.contains("timed out") || message.contains("timeout") {
        AiError::Timeout("receipt extraction timed out".into())
    } else {
        AiError::Unknown(format!("receipt extraction failed: {}", error.0))
    }
}

// ---------------------------------------------------------------------------
// Production extractor
// ---------------------------------------------------------------------------

/// Calls the deployed extraction function over HTTP.
///
/// Uses the unbounded POST variant: the function bounds its own provider
/// calls, and its gateway enforces an overall request deadline.
pub struct EdgeFunctionExtractor {
    http: HttpClient,
    function_url: String,
}

impl EdgeFunctionExtractor {
    pub fn new(function_url: &str) -> Self {
        Self {
            http: HttpClient::new(),
            function_url: function_url.to_string(),
        }
    }
}

#[async_trait]
impl ReceiptExtractor for EdgeFunctionExtractor {
    async fn invoke(
        &self,
        file_path: &str,
        auth_token: Option<&str>,
    ) -> Result<Option<ExtractedReceipt>, ExtractorError> {
        let mut headers = Vec::new();
        if let Some(token) = auth_token {
            headers.push(("Authorization", format!("Bearer {token}")));
        }
        let body = json!({ "file_path": file_path });

        let value = self
            .http
            .post_json(&self.function_url, &headers, &body)
            .await
            .map_err(|e| ExtractorError(e.to_string()))?;

        if value.is_null() {
            return Ok(None);
        }

        let receipt = serde_json::from_value(value)
            .map_err(|e| ExtractorError(format!("unexpected extraction payload: {e}")))?;
        Ok(Some(receipt))
    }
}

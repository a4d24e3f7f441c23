//! Receipt processing orchestrator.
//!
//! Single entry point driving the five-step pipeline:
//! consent -> ownership -> taxonomy -> remote extraction -> category mapping.
//!
//! Uses trait-based DI for all collaborators so the orchestrator remains
//! fully testable with in-memory fakes. Steps run strictly in order over one
//! fresh context; the first failure aborts the rest and nothing partial is
//! ever returned. Retry, where it exists, lives inside the remote call.

use crate::config::AiConfig;
use crate::error::AiError;

use super::categories::fetch_categories;
use super::consent::validate_consent;
use super::context::ProcessingContext;
use super::extraction::{run_extraction, EdgeFunctionExtractor};
use super::mapping::assemble_result;
use super::ownership::validate_ownership;
use super::types::{CategoryStore, ConsentStore, ProcessedReceipt, ReceiptExtractor};

pub struct ReceiptProcessor {
    consent: Box<dyn ConsentStore>,
    categories: Box<dyn CategoryStore>,
    extractor: Box<dyn ReceiptExtractor>,
    auth_token: Option<String>,
}

impl std::fmt::Debug for ReceiptProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReceiptProcessor")
            .field("auth_token", &self.auth_token)
            .finish_non_exhaustive()
    }
}

impl ReceiptProcessor {
    pub fn new(
        consent: Box<dyn ConsentStore>,
        categories: Box<dyn CategoryStore>,
        extractor: Box<dyn ReceiptExtractor>,
    ) -> Self {
        Self {
            consent,
            categories,
            extractor,
            auth_token: None,
        }
    }

    /// Forward a bearer token to the remote extraction function.
    pub fn with_auth_token(mut self, token: &str) -> Self {
        self.auth_token = Some(token.to_string());
        self
    }

    /// Build a processor wired to the deployed extraction function.
    pub fn from_config(
        config: &AiConfig,
        consent: Box<dyn ConsentStore>,
        categories: Box<dyn CategoryStore>,
    ) -> Result<Self, AiError> {
        let url = config.extraction_url.as_deref().ok_or_else(|| {
            AiError::Configuration("no extraction function URL configured".into())
        })?;
        Ok(Self::new(
            consent,
            categories,
            Box::new(EdgeFunctionExtractor::new(url)),
        ))
    }

    /// Process one uploaded receipt for one user.
    pub async fn process_receipt(
        &self,
        file_path: &str,
        user_id: &str,
    ) -> Result<ProcessedReceipt, AiError> {
        let mut context = ProcessingContext::new(file_path, user_id);

        tracing::info!(user_id, file_path, "receipt processing: start");

        validate_consent(self.consent.as_ref(), &mut context).await?;
        validate_ownership(&context.file_path, &context.user_id)?;
        fetch_categories(self.categories.as_ref(), &mut context).await?;
        run_extraction(
            self.extractor.as_ref(),
            self.auth_token.as_deref(),
            &mut context,
        )
        .await?;
        assemble_result(&mut context)?;

        let result = context.result.take().ok_or_else(|| {
            AiError::Configuration("pipeline finished without a result".into())
        })?;

        tracing::info!(
            user_id,
            groups = result.expenses.len(),
            total = %result.total_amount,
            elapsed_ms = result.processing_time_ms,
            "receipt processing: complete"
        );

        Ok(result)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

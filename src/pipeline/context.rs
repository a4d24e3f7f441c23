//! Per-run accumulator threaded through the pipeline steps.

use std::time::Instant;

use crate::error::AiError;

use super::types::{Category, ExtractedReceipt, ProcessedReceipt};

/// State owned by exactly one pipeline run, discarded when the run ends.
///
/// Steps append fields as they complete. Accessors fail fast with a
/// configuration error when a prerequisite step was skipped; that signals a
/// pipeline-ordering defect, not a user error.
#[derive(Debug)]
pub struct ProcessingContext {
    pub file_path: String,
    pub user_id: String,
    pub started_at: Instant,
    pub consent_given: Option<bool>,
    pub categories: Option<Vec<Category>>,
    pub raw_receipt: Option<ExtractedReceipt>,
    pub result: Option<ProcessedReceipt>,
}

impl ProcessingContext {
    pub fn new(file_path: &str, user_id: &str) -> Self {
        Self {
            file_path: file_path.to_string(),
            user_id: user_id.to_string(),
            started_at: Instant::now(),
            consent_given: None,
            categories: None,
            raw_receipt: None,
            result: None,
        }
    }

    /// Taxonomy loaded by the category step.
    pub fn categories(&self) -> Result<&[Category], AiError> {
        self.categories.as_deref().ok_or_else(|| {
            AiError::Configuration("pipeline context is missing the category taxonomy".into())
        })
    }

    /// Raw extraction stored by the AI step.
    pub fn raw_receipt(&self) -> Result<&ExtractedReceipt, AiError> {
        self.raw_receipt.as_ref().ok_or_else(|| {
            AiError::Configuration("pipeline context is missing the extraction result".into())
        })
    }

    /// Milliseconds since the run started.
    pub fn elapsed_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn fresh_context_has_no_accumulated_fields() {
        let context = ProcessingContext::new("receipts/user-1/r.jpg", "user-1");
        assert!(context.consent_given.is_none());
        assert!(context.categories.is_none());
        assert!(context.raw_receipt.is_none());
        assert!(context.result.is_none());
    }

    #[test]
    fn missing_prerequisites_fail_as_configuration_errors() {
        let context = ProcessingContext::new("receipts/user-1/r.jpg", "user-1");
        assert_eq!(
            context.categories().unwrap_err().kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            context.raw_receipt().unwrap_err().kind(),
            ErrorKind::Configuration
        );
    }
}

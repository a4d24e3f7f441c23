//! Collaborator interfaces and the pipeline data model.
//!
//! Consent, the category taxonomy, and the remote extraction function are
//! black boxes behind traits so the pipeline stays fully testable with
//! in-memory fakes.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::AiError;

// ---------------------------------------------------------------------------
// Data model
// ---------------------------------------------------------------------------

/// Per-user flags gating AI processing.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsentRecord {
    pub ai_consent_given: bool,
}

/// An expense category from the canonical taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// One line item as extracted by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedItem {
    pub name: String,
    pub amount: f64,
    /// Free-text category label guessed by the model; mapped onto the
    /// canonical taxonomy in the final pipeline step.
    pub category: String,
}

/// Raw output of the remote extraction function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedReceipt {
    pub items: Vec<ExtractedItem>,
    pub total: f64,
    #[serde(default)]
    pub date: Option<String>,
}

/// Items grouped under one canonical category.
#[derive(Debug, Clone, Serialize)]
pub struct ExpenseGroup {
    pub category_id: String,
    pub category_name: String,
    /// Group total formatted to exactly two decimal places.
    pub amount: String,
    pub items: Vec<ExtractedItem>,
}

/// Final assembled result returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedReceipt {
    pub expenses: Vec<ExpenseGroup>,
    pub total_amount: String,
    pub currency: String,
    pub receipt_date: Option<NaiveDate>,
    pub processing_time_ms: u64,
}

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

/// Failure reported by the remote extraction function.
///
/// Deliberately opaque: the function encodes rate-limit and timeout
/// conditions in its message text, which the extraction step inspects.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ExtractorError(pub String);

#[async_trait]
pub trait ConsentStore: Send + Sync {
    /// Fetch the consent flags for one user.
    async fn get(&self, user_id: &str) -> Result<ConsentRecord, AiError>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Load the complete category taxonomy.
    async fn list_all(&self) -> Result<Vec<Category>, AiError>;
}

#[async_trait]
pub trait ReceiptExtractor: Send + Sync {
    /// Run remote extraction on an uploaded receipt image.
    ///
    /// `Ok(None)` means the function answered but produced no data.
    async fn invoke(
        &self,
        file_path: &str,
        auth_token: Option<&str>,
    ) -> Result<Option<ExtractedReceipt>, ExtractorError>;
}

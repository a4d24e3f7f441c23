//! Paragon AI receipt-extraction engine.
//!
//! Turns a photographed receipt into validated expense records: a resilient
//! client for a remote LLM provider (timeout-bounded, retried,
//! error-classified) plus the five-step pipeline that gates, extracts and
//! maps the result onto the expense taxonomy. The rest of the tracker
//! (storage, auth, UI) collaborates through the traits in `pipeline::types`.

pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;

use tracing_subscriber::EnvFilter;

pub use config::AiConfig;
pub use error::{AiError, DomainErrorCode, ErrorKind};
pub use llm::{ChatOptions, LlmClient};
pub use pipeline::{ProcessedReceipt, ReceiptProcessor};

/// Initialize structured logging for binaries embedding the engine.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

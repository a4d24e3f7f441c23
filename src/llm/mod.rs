pub mod client;
pub mod http;
pub mod receipt;
pub mod request;
pub mod retry;
pub mod types;

pub use client::{ChatOptions, ChatTransport, LlmClient, OpenAiTransport};
pub use http::{HttpClient, HttpError};
pub use receipt::{receipt_response_schema, ReceiptVision};
pub use request::RequestBuilder;
pub use retry::{with_retry, RetryPolicy};
pub use types::*;

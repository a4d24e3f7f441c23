pub mod categories;
pub mod consent;
pub mod context;
pub mod extraction;
pub mod mapping;
pub mod ownership;
pub mod processor;
pub mod types;

pub use context::ProcessingContext;
pub use extraction::EdgeFunctionExtractor;
pub use processor::ReceiptProcessor;
pub use types::*;

//! Consent gate: AI processing never runs without an explicit opt-in.

use crate::error::{AiError, DomainErrorCode};

use super::context::ProcessingContext;
use super::types::ConsentStore;

/// Verify the user has granted AI processing consent.
///
/// Store failures propagate as-is; they were typed at their own boundary.
pub(crate) async fn validate_consent(
    store: &dyn ConsentStore,
    context: &mut ProcessingContext,
) -> Result<(), AiError> {
    let record = store.get(&context.user_id).await?;

    if !record.ai_consent_given {
        tracing::info!(user_id = %context.user_id, "receipt processing blocked: no AI consent");
        return Err(AiError::domain(
            DomainErrorCode::ConsentRequired,
            "AI consent required",
        ));
    }

    context.consent_given = Some(true);
    Ok(())
}

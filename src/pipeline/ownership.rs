//! File ownership check, pure and synchronous.
//!
//! Storage paths follow `<prefix>/<owner-id>/<file>`; the embedded owner id
//! must match the requesting user before anything touches the file.

use crate::error::{AiError, DomainErrorCode};

/// Reject paths whose embedded owner id is not the requesting user.
///
/// A path too short to carry an owner segment is rejected the same way.
pub(crate) fn validate_ownership(file_path: &str, user_id: &str) -> Result<(), AiError> {
    let owner = file_path.split('/').nth(1);

    if owner != Some(user_id) {
        tracing::warn!(user_id, file_path, "file ownership check failed");
        return Err(AiError::domain(
            DomainErrorCode::Forbidden,
            format!("file '{file_path}' does not belong to the requesting user"),
        ));
    }

    Ok(())
}

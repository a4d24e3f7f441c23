//! Category taxonomy fetch.

use crate::error::AiError;

use super::context::ProcessingContext;
use super::types::CategoryStore;

/// Load the full taxonomy into the context.
///
/// An empty taxonomy is a deployment defect, not a legitimate empty result:
/// the mapping step cannot assign a single item without it.
pub(crate) async fn fetch_categories(
    store: &dyn CategoryStore,
    context: &mut ProcessingContext,
) -> Result<(), AiError> {
    let categories = store.list_all().await?;

    if categories.is_empty() {
        return Err(AiError::Configuration(
            "category taxonomy is empty".into(),
        ));
    }

    tracing::debug!(count = categories.len(), "category taxonomy loaded");
    context.categories = Some(categories);
    Ok(())
}

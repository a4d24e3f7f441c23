//! Terminal step: map free-text labels onto the canonical taxonomy and
//! assemble the final expense breakdown.

use chrono::NaiveDate;

use crate::config::CURRENCY;
use crate::error::{AiError, DomainErrorCode};

use super::context::ProcessingContext;
use super::types::{Category, ExpenseGroup, ExtractedItem, ProcessedReceipt};

/// Names accepted as the catch-all category, compared case-insensitively.
const FALLBACK_CATEGORY_NAMES: &[&str] = &["inne", "other"];

/// Group extracted items by canonical category and assemble the result.
///
/// Requires the taxonomy and the raw extraction in the context; their
/// absence is an ordering defect reported as a configuration error.
pub(crate) fn assemble_result(context: &mut ProcessingContext) -> Result<(), AiError> {
    let raw = context.raw_receipt()?.clone();
    let categories = context.categories()?.to_vec();

    // Group by category id, preserving first-appearance order.
    let mut grouped: Vec<(Category, Vec<ExtractedItem>)> = Vec::new();
    for item in &raw.items {
        let category = match_category(&item.category, &categories).ok_or_else(|| {
            AiError::domain(
                DomainErrorCode::UnmappedCategory,
                format!("no category found for label '{}'", item.category),
            )
        })?;
        match grouped.iter_mut().find(|(c, _)| c.id == category.id) {
            Some((_, items)) => items.push(item.clone()),
            None => grouped.push((category.clone(), vec![item.clone()])),
        }
    }

    let expenses = grouped
        .into_iter()
        .map(|(category, items)| {
            let sum: f64 = items.iter().map(|item| item.amount).sum();
            ExpenseGroup {
                category_id: category.id,
                category_name: category.name,
                amount: format_amount(sum),
                items,
            }
        })
        .collect();

    let receipt_date = raw.date.as_deref().and_then(parse_receipt_date);

    context.result = Some(ProcessedReceipt {
        expenses,
        total_amount: format_amount(raw.total),
        currency: CURRENCY.to_string(),
        receipt_date,
        processing_time_ms: context.elapsed_ms(),
    });
    Ok(())
}

/// Best-effort label match: exact name, then substring either way, then the
/// catch-all category when the taxonomy carries one.
fn match_category<'a>(label: &str, categories: &'a [Category]) -> Option<&'a Category> {
    let label = label.trim().to_lowercase();

    if !label.is_empty() {
        if let Some(category) = categories
            .iter()
            .find(|c| c.name.to_lowercase() == label)
        {
            return Some(category);
        }
        if let Some(category) = categories.iter().find(|c| {
            let name = c.name.to_lowercase();
            name.contains(&label) || label.contains(&name)
        }) {
            return Some(category);
        }
    }

    categories
        .iter()
        .find(|c| FALLBACK_CATEGORY_NAMES.contains(&c.name.to_lowercase().as_str()))
}

/// Exactly two decimal places, matching stored amounts.
fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}

/// Receipts print dates as YYYY-MM-DD; anything else is dropped.
fn parse_receipt_date(raw: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            tracing::warn!(raw, "unparsable receipt date, dropping");
            None
        }
    }
}

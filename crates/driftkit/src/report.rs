//! One-call comparison of two raw documents

use crate::document::{parse_actual_state, parse_declared_state};
use crate::error::Result;
use crate::reconcile::{ReconcileOptions, compare_states_with};
use crate::summary::calculate_summary;
use crate::types::DriftReport;
use chrono::Utc;

/// Parse both documents, reconcile them and summarize the result.
///
/// The declared document is parsed first, so when both are malformed the
/// declared-state error is the one reported.
pub fn compare_documents(
    declared_text: &str,
    actual_text: &str,
    options: &ReconcileOptions,
) -> Result<DriftReport> {
    let declared = parse_declared_state(declared_text)?;
    let actual = parse_actual_state(actual_text)?;

    let checked_at = options.checked_at.unwrap_or_else(Utc::now);
    let options = options.clone().with_checked_at(checked_at);

    let resources = compare_states_with(&declared, &actual, &options);
    let summary = calculate_summary(&resources);

    log::info!(
        "Compared {} resources: {} synced, {} modified, {} missing, {} added (score {})",
        summary.total,
        summary.synced,
        summary.modified,
        summary.missing,
        summary.added,
        summary.score
    );

    Ok(DriftReport {
        last_sync: checked_at,
        resources,
        summary,
    })
}

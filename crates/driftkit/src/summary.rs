//! Drift summary and weighted health score

use crate::types::{DriftStatus, DriftSummary, Resource, Severity};

/// Weight of each status in the health score.
const SYNCED_WEIGHT: f64 = 1.0;
const MODIFIED_WEIGHT: f64 = 0.5;
const ADDED_WEIGHT: f64 = 0.3;
const MISSING_WEIGHT: f64 = 0.0;

/// Count resources per status and compute the score.
pub fn calculate_summary(resources: &[Resource]) -> DriftSummary {
    let count = |status: DriftStatus| resources.iter().filter(|r| r.status == status).count();

    let synced = count(DriftStatus::Synced);
    let modified = count(DriftStatus::Modified);
    let missing = count(DriftStatus::Missing);
    let added = count(DriftStatus::Added);

    DriftSummary {
        total: resources.len(),
        synced,
        modified,
        missing,
        added,
        score: calculate_drift_score(synced, modified, missing, added),
    }
}

/// Weighted health score in `0..=100`.
///
/// An empty set scores 100. Otherwise
/// `round((synced*1 + modified*0.5 + added*0.3 + missing*0) / total * 100)`,
/// rounding half away from zero.
pub fn calculate_drift_score(synced: usize, modified: usize, missing: usize, added: usize) -> u8 {
    if synced == 0 && modified == 0 && missing == 0 && added == 0 {
        return 100;
    }

    // Summed in f64, the counts may exceed usize::MAX together
    let total = synced as f64 + modified as f64 + missing as f64 + added as f64;

    let weighted = synced as f64 * SYNCED_WEIGHT
        + modified as f64 * MODIFIED_WEIGHT
        + added as f64 * ADDED_WEIGHT
        + missing as f64 * MISSING_WEIGHT;

    ((weighted / total) * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Severity band of a score.
pub fn drift_severity(score: u8) -> Severity {
    Severity::from_score(score)
}

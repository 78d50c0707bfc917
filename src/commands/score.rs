//! `driftscope score` - score arbitrary status counts

use anyhow::{Context, Result};
use driftkit::{Severity, calculate_drift_score};
use serde::Serialize;

use crate::cli::ScoreArgs;
use crate::ui;

#[derive(Debug, Serialize)]
struct ScoreOutput {
    total: usize,
    score: u8,
    severity: Severity,
}

pub fn run(args: &ScoreArgs) -> Result<()> {
    let output = score_counts(args)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    ui::kv("Total", &output.total.to_string());
    ui::kv(
        "Score",
        &format!("{} {}", ui::score_bar(output.score, 20), ui::score_label(output.score)),
    );
    Ok(())
}

fn score_counts(args: &ScoreArgs) -> Result<ScoreOutput> {
    let total = [args.modified, args.missing, args.added]
        .into_iter()
        .try_fold(args.synced, usize::checked_add)
        .context("Resource counts are too large to total")?;

    let score = calculate_drift_score(args.synced, args.modified, args.missing, args.added);
    Ok(ScoreOutput {
        total,
        score,
        severity: Severity::from_score(score),
    })
}

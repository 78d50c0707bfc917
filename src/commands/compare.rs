//! `driftscope compare` - reconcile both documents and print the report

use anyhow::{Result, bail};
use colored::Colorize;
use driftkit::{DriftReport, DriftStatus, DriftSummary, Resource};

use crate::Context;
use crate::cli::CompareArgs;
use crate::config::OutputFormat;
use crate::input;
use crate::ui;

pub fn run(ctx: &Context, args: CompareArgs) -> Result<()> {
    let (paths, report) = super::load_report(ctx, &args.inputs)?;

    let only: Vec<DriftStatus> = args.only.iter().copied().map(DriftStatus::from).collect();
    let shown = filter_report(&report, &only);

    match args.format.unwrap_or(ctx.config.format) {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&shown)?),
        OutputFormat::Text => {
            ui::header("Drift Report");
            ui::kv("Declared", &input::display_name(&paths.declared));
            ui::kv("Actual", &input::display_name(&paths.actual));
            ui::kv("Checked", &report.last_sync.to_rfc3339());

            if !ctx.quiet {
                display_resources(&shown.resources, ctx.verbose > 0);
            }
            display_summary(&report.summary);
        }
    }

    check_threshold(&report.summary, args.fail_under.or(ctx.config.fail_under))
}

/// Keep only resources in the given statuses; an empty filter keeps all.
///
/// The summary always describes the full resource set.
pub fn filter_report(report: &DriftReport, only: &[DriftStatus]) -> DriftReport {
    if only.is_empty() {
        return report.clone();
    }

    DriftReport {
        last_sync: report.last_sync,
        resources: report
            .resources
            .iter()
            .filter(|r| only.contains(&r.status))
            .cloned()
            .collect(),
        summary: report.summary,
    }
}

/// Fail when the score is below the threshold.
pub fn check_threshold(summary: &DriftSummary, fail_under: Option<u8>) -> Result<()> {
    match fail_under {
        Some(threshold) if summary.score < threshold => bail!(
            "Drift score {} is below the required {} ({} of {} resources drifted)",
            summary.score,
            threshold,
            summary.drifted(),
            summary.total
        ),
        _ => Ok(()),
    }
}

fn display_resources(resources: &[Resource], show_dependencies: bool) {
    ui::section("Resources");

    if resources.is_empty() {
        ui::dim("No resources");
        return;
    }

    for resource in resources {
        println!(
            "  {} {:<16} {:<36} {:<10} {}",
            ui::status_symbol(resource.status),
            resource.resource_type.as_str(),
            ui::truncate(&resource.name, 36),
            ui::status_label(resource.status),
            resource.region.dimmed()
        );

        if show_dependencies && !resource.dependencies.is_empty() {
            ui::dim(&format!("    depends on: {}", resource.dependencies.join(", ")));
        }
    }
}

fn display_summary(summary: &DriftSummary) {
    ui::section("Summary");
    ui::kv("Total", &summary.total.to_string());
    for status in DriftStatus::ALL {
        ui::kv(
            &capitalize(status.as_str()),
            &format!("{} {}", ui::status_symbol(status), summary.count(status)),
        );
    }
    ui::kv(
        "Score",
        &format!("{} {}", ui::score_bar(summary.score, 20), ui::score_label(summary.score)),
    );

    println!();
    if summary.drifted() == 0 {
        ui::success("No drift detected");
    } else {
        ui::warn(&format!(
            "{} of {} resources drifted. Run `driftscope diff` for details",
            summary.drifted(),
            summary.total
        ));
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

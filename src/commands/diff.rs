//! `driftscope diff` - field-level view of drifted resources

use anyhow::Result;
use colored::Colorize;
use driftkit::{ConfigDiff, DriftStatus, Resource};

use crate::Context;
use crate::cli::InputArgs;
use crate::ui;

pub fn run(ctx: &Context, args: InputArgs) -> Result<()> {
    let (_, report) = super::load_report(ctx, &args)?;

    if report.summary.drifted() == 0 {
        println!();
        ui::success(&format!("All {} resources in sync", report.summary.total));
        return Ok(());
    }

    ui::header("Configuration Drift");
    for status in DRIFT_ORDER {
        let group: Vec<&Resource> = report.with_status(status).collect();
        if group.is_empty() {
            continue;
        }

        ui::section(&format!("{} ({})", status_heading(status), group.len()));
        for resource in group {
            display_resource(resource);
        }
    }

    println!();
    ui::info(&format!(
        "{} modified, {} missing, {} added",
        report.summary.modified, report.summary.missing, report.summary.added
    ));
    Ok(())
}

/// Drifted statuses, in display order
const DRIFT_ORDER: [DriftStatus; 3] = [DriftStatus::Modified, DriftStatus::Missing, DriftStatus::Added];

fn status_heading(status: DriftStatus) -> &'static str {
    match status {
        DriftStatus::Modified => "Modified",
        DriftStatus::Missing => "Missing",
        DriftStatus::Added => "Added",
        DriftStatus::Synced => "Synced",
    }
}

fn display_resource(resource: &Resource) {
    println!(
        "{} {} {}",
        ui::status_symbol(resource.status),
        resource.name.bold(),
        format!("({}, {})", resource.resource_type, resource.id).dimmed()
    );

    match resource.status {
        DriftStatus::Modified => {
            for change in resource.changes() {
                println!("    {}", describe_change(&change));
            }
        }
        DriftStatus::Missing => ui::dim("declared in Terraform state but not found"),
        DriftStatus::Added => {
            ui::dim("found but not declared in Terraform state");
            for (key, value) in &resource.actual_config {
                println!("    {} {} = {}", "+".blue(), key, ui::format_value(Some(value)));
            }
        }
        DriftStatus::Synced => {}
    }
}

/// One line describing a field change: `field: declared → actual`
pub fn describe_change(change: &ConfigDiff) -> String {
    format!(
        "{}: {} → {}",
        change.field,
        ui::truncate(&ui::format_value(change.terraform_value.as_ref()), 60),
        ui::truncate(&ui::format_value(change.actual_value.as_ref()), 60)
    )
}

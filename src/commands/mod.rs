pub mod compare;
pub mod config;
pub mod diff;
pub mod score;

use anyhow::Result;
use driftkit::{DriftReport, ReconcileOptions};

use crate::Context;
use crate::cli::InputArgs;
use crate::input::{self, InputPaths};

/// Read both documents and run the engine over them.
pub(crate) fn load_report(ctx: &Context, args: &InputArgs) -> Result<(InputPaths, DriftReport)> {
    let paths = input::resolve_paths(args, &ctx.config)?;
    let documents = input::read_documents(&paths)?;

    let region = args
        .region
        .clone()
        .unwrap_or_else(|| ctx.config.default_region.clone());
    let options = ReconcileOptions::default().with_default_region(region);

    let report = driftkit::compare_documents(&documents.declared, &documents.actual, &options)?;
    Ok((paths, report))
}

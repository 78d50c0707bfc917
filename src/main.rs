mod cli;
mod commands;
mod config;
mod input;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use config::DriftscopeConfig;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
    pub config: DriftscopeConfig,
    /// Config file given with `--config`, if any
    pub config_path: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = DriftscopeConfig::load(cli.config.as_deref())?;
    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
        config,
        config_path: cli.config,
    };

    match cli.command {
        Command::Compare(args) => commands::compare::run(&ctx, args),
        Command::Diff(args) => commands::diff::run(&ctx, args),
        Command::Score(args) => commands::score::run(&args),
        Command::Config(cmd) => commands::config::run(&ctx, cmd),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "driftscope", &mut io::stdout());
            Ok(())
        }
    }
}

fn report_error(err: &anyhow::Error) {
    ui::error(&format!("{err:#}"));
    // Document errors carry a hint about what the input should look like
    if let Some(document_err) = err.downcast_ref::<driftkit::Error>() {
        ui::dim(document_err.kind().advice());
    }
}

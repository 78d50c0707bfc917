use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use driftkit::DriftStatus;
use std::path::PathBuf;

use crate::config::OutputFormat;

#[derive(Parser)]
#[command(name = "driftscope")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Detect drift between declared Terraform state and live infrastructure", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (default: ~/.config/driftscope/config.toml)
    #[arg(long, global = true, env = "DRIFTSCOPE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare declared state against actual state and summarize drift
    Compare(CompareArgs),

    /// Show field-level differences for drifted resources
    Diff(InputArgs),

    /// Compute a drift score from status counts
    Score(ScoreArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Inputs
// ============================================================================

#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Declared Terraform state file ("-" for stdin)
    #[arg(short, long)]
    pub declared: Option<PathBuf>,

    /// Actual state file ("-" for stdin)
    #[arg(short, long)]
    pub actual: Option<PathBuf>,

    /// Region for observed resources that don't report one
    #[arg(long)]
    pub region: Option<String>,
}

// ============================================================================
// Compare
// ============================================================================

#[derive(Args)]
pub struct CompareArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Exit with an error when the drift score is below this value
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub fail_under: Option<u8>,

    /// Only list resources with these statuses (repeatable)
    #[arg(long, value_enum)]
    pub only: Vec<StatusArg>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Synced,
    Modified,
    Missing,
    Added,
}

impl From<StatusArg> for DriftStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Synced => DriftStatus::Synced,
            StatusArg::Modified => DriftStatus::Modified,
            StatusArg::Missing => DriftStatus::Missing,
            StatusArg::Added => DriftStatus::Added,
        }
    }
}

// ============================================================================
// Score
// ============================================================================

#[derive(Args)]
pub struct ScoreArgs {
    /// Number of synced resources
    pub synced: usize,
    /// Number of modified resources
    pub modified: usize,
    /// Number of missing resources
    pub missing: usize,
    /// Number of added resources
    pub added: usize,

    /// Print score and severity as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// Config
// ============================================================================

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration and where it came from
    Show,

    /// Print the default config file path
    Path,
}

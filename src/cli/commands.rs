use std::path::PathBuf;

use clap::{Parser, Subcommand, Args};

#[derive(Parser)]
#[command(
    name = "opscast",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"),
    about = "Synthetic operational metrics, forecasts and efficiency recommendations"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress and the summary; only warnings and errors are logged
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate data, forecast, fetch recommendations and write the report (default)
    Run(RunArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

#[derive(Args, Clone, Debug, Default)]
pub struct RunArgs {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output directory for charts and the report
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Random seed for the synthetic data
    #[arg(long)]
    pub seed: Option<u64>,

    /// Skip the recommendation service and emit placeholders
    #[arg(long)]
    pub offline: bool,
}

#[derive(Args, Clone, Debug)]
pub struct ValidateArgs {
    /// Configuration file to check
    #[arg(short, long)]
    pub config: PathBuf,
}

//! Command-line definition for the `holdover` binary.

use clap::{Args, Parser, Subcommand};
use holdover_core::{DEFAULT_TICK_INTERVAL_MS, DEFAULT_TOTAL_TICKS, ProgressConfig};

/// Drive a retained progress presenter through host lifecycle events.
#[derive(Debug, Parser)]
#[command(name = "holdover")]
#[command(about = "Demonstrate presenter retention across container recreation")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start a progress run and simulate recreations while it ticks
    Run(RunArgs),
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Number of ticks in a full run
    #[arg(long, env = "HOLDOVER_TOTAL_TICKS", default_value_t = DEFAULT_TOTAL_TICKS)]
    pub ticks: u32,

    /// Delay between ticks, in milliseconds
    #[arg(
        long = "interval-ms",
        env = "HOLDOVER_TICK_INTERVAL_MS",
        default_value_t = DEFAULT_TICK_INTERVAL_MS
    )]
    pub interval_ms: u64,

    /// Recreate the screen when progress reaches K (repeatable)
    #[arg(long = "recreate-at", value_name = "K")]
    pub recreate_at: Vec<u32>,

    /// Leave the screen for good when progress reaches K
    #[arg(long = "leave-at", value_name = "K")]
    pub leave_at: Option<u32>,

    /// Do not draw the progress bar
    #[arg(long = "no-bar")]
    pub no_bar: bool,
}

impl RunArgs {
    pub const fn config(&self) -> ProgressConfig {
        ProgressConfig::new(self.ticks, self.interval_ms)
    }
}

//! CLI entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use holdover_cli::{Cli, Commands, DemoOptions, run_demo};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run(args) => {
            let report = run_demo(DemoOptions::from(&args)).await?;

            println!();
            println!("Progress reached:    {}/{}", report.final_progress, args.ticks);
            println!("Run completed:       {}", report.completed);
            println!("Recreations:         {}", report.recreations);
            println!("Presenters created:  {}", report.presenters_created);
            println!("Retained after exit: {}", report.retained_after_exit);
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `-v` selects debug output.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

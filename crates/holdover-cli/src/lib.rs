//! Terminal adapter for holdover.
//!
//! Parses the command line, renders the progress screen with `indicatif`, and
//! plays the host's part in the container lifecycle.

#![deny(unsafe_code)]

pub mod demo;
pub mod parser;
pub mod view;

pub use demo::{DemoOptions, DemoReport, run_demo};
pub use parser::{Cli, Commands, RunArgs};
pub use view::{BarOutput, TerminalView};

impl From<&RunArgs> for DemoOptions {
    fn from(args: &RunArgs) -> Self {
        Self {
            config: args.config(),
            recreate_at: args.recreate_at.clone(),
            leave_at: args.leave_at,
            output: if args.no_bar {
                BarOutput::Hidden
            } else {
                BarOutput::Stderr
            },
        }
    }
}

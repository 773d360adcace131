//! Command-line interface

pub mod commands;

use clap::{ArgAction, Parser, Subcommand};

use commands::{HeadersCommands, ProcessCommands};

#[derive(Parser, Debug)]
#[command(name = "upc-concat")]
#[command(version)]
#[command(about = "Collapse offer spreadsheets into one row per offer with concatenated UPCs", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Consolidate an offer sheet and write the result
    Process(ProcessCommands),
    /// Show the sheets and column headers of an input file
    Headers(HeadersCommands),
}

impl Cli {
    /// Default log filter for the requested verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

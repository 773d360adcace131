mod cli;
mod concat;
mod config;
mod excel;
mod preview;

use anyhow::Result;
use clap::Parser;
use colored::*;

use cli::commands::headers::handle_headers_command;
use cli::commands::process::handle_process_command;
use cli::{Cli, Commands};
use config::Config;

fn main() {
    // A .env file may point UPC_CONCAT_CONFIG somewhere else
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".bright_red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Process(args) => {
            let config = Config::load()?;
            handle_process_command(args, &config)
        }
        Commands::Headers(args) => handle_headers_command(args),
    }
}

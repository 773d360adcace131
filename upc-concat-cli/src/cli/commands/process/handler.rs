//! Process command handler

use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use colored::*;
use is_terminal::IsTerminal;

use super::ProcessCommands;
use super::prompt::prompt_missing;
use crate::concat::{ColumnSelection, TransformReport, transform};
use crate::config::Config;
use crate::excel::{default_output_path, read_table, with_output_extension, write_output};
use crate::preview::render_preview;

/// Rejected rows listed individually before summarizing the rest
const MAX_LISTED_REJECTIONS: usize = 10;

/// Handle the process command
pub fn handle_process_command(args: ProcessCommands, config: &Config) -> Result<()> {
    if args.no_color {
        colored::control::set_override(false);
    }

    if !args.input.exists() {
        anyhow::bail!("Input file does not exist: {}", args.input.display());
    }

    let start = Instant::now();
    let table = read_table(&args.input, args.sheet.as_deref())?;
    if table.headers().iter().all(|h| h.trim().is_empty()) {
        anyhow::bail!("Input has no header row: {}", args.input.display());
    }
    if table.is_empty() {
        log::warn!("Input {} has no data rows", args.input.display());
    }

    let mut selection = ColumnSelection::new(
        args.offer_id.clone().unwrap_or_default(),
        args.title.clone().unwrap_or_default(),
        args.item_name.clone().unwrap_or_default(),
        args.barcode.clone().unwrap_or_default(),
    );
    config.columns.fill(&mut selection);

    let interactive = !args.non_interactive && io::stdin().is_terminal();
    if interactive {
        prompt_missing(&mut selection, table.headers())?;
    }

    let report = transform(&table, &selection).context("Invalid column selection")?;

    let output = output_path(&args, config);
    if output == args.input {
        anyhow::bail!(
            "Refusing to overwrite the input file: {}",
            args.input.display()
        );
    }
    write_output(&report.rows, &output)?;

    print_summary(&report, &output);
    log::info!("Processed {} in {:?}", args.input.display(), start.elapsed());

    if args.preview {
        println!();
        print!("{}", render_preview(&report.rows, config.output.preview_rows));
    }

    Ok(())
}

fn output_path(args: &ProcessCommands, config: &Config) -> PathBuf {
    let format = args.format.unwrap_or(config.output.format);

    match &args.output {
        Some(path) => with_output_extension(path, format),
        None => default_output_path(&args.input, config.output.directory.as_deref(), format),
    }
}

fn print_summary(report: &TransformReport, output: &std::path::Path) {
    let stats = &report.stats;

    if report.rows.is_empty() {
        println!(
            "{} no offers with a barcode found in {} rows",
            "Warning:".yellow().bold(),
            stats.input_rows
        );
    }

    println!(
        "Consolidated {} rows into {} offers",
        stats.input_rows.to_string().bold(),
        stats.groups.to_string().bright_green().bold()
    );

    if stats.blank_barcodes > 0 {
        println!("  {} rows without a barcode skipped", stats.blank_barcodes);
    }
    if stats.duplicates_removed > 0 {
        println!("  {} duplicate rows removed", stats.duplicates_removed);
    }
    if !report.rejected.is_empty() {
        println!(
            "  {} rows with an invalid barcode skipped:",
            report.rejected.len().to_string().yellow()
        );
        for rejected in report.rejected.iter().take(MAX_LISTED_REJECTIONS) {
            println!("    {}", rejected.to_string().yellow());
        }
        if report.rejected.len() > MAX_LISTED_REJECTIONS {
            println!(
                "    ... and {} more",
                report.rejected.len() - MAX_LISTED_REJECTIONS
            );
        }
    }

    println!(
        "File '{}' has been created.",
        output.display().to_string().bright_green()
    );
}

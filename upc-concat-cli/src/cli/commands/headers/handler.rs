use anyhow::Result;
use colored::*;

use super::HeadersCommands;
use crate::cli::commands::process::guess_column;
use crate::concat::ColumnRole;
use crate::excel::{list_sheets, read_table};

/// Handle the headers command
pub fn handle_headers_command(args: HeadersCommands) -> Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file does not exist: {}", args.input.display());
    }

    let sheets = list_sheets(&args.input)?;
    let selected = args
        .sheet
        .clone()
        .or_else(|| sheets.first().cloned())
        .unwrap_or_default();

    println!("{}", "Sheets:".bold());
    for sheet in &sheets {
        if *sheet == selected {
            println!("  {} {}", "*".bright_green(), sheet.bright_green());
        } else {
            println!("    {}", sheet);
        }
    }

    let table = read_table(&args.input, args.sheet.as_deref())?;
    let headers = table.headers();

    println!();
    println!("{} ({} data rows)", "Columns:".bold(), table.len());
    for (idx, header) in headers.iter().enumerate() {
        let roles: Vec<&str> = ColumnRole::all_variants()
            .iter()
            .filter(|role| guess_column(**role, headers) == Some(idx))
            .map(|role| role.label())
            .collect();

        if roles.is_empty() {
            println!("  {:>3}  {}", idx + 1, header);
        } else {
            println!(
                "  {:>3}  {}  {}",
                idx + 1,
                header,
                format!("(likely {})", roles.join(", ")).dimmed()
            );
        }
    }

    Ok(())
}

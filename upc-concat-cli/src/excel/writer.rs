//! Write consolidated offers to xlsx, csv or json

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet};
use serde::{Deserialize, Serialize};

use crate::concat::{OfferRow, output_cols};

/// Worksheet name used for xlsx output
pub const SHEET_NAME: &str = "Concatenated";

/// Column indices for the output sheet
mod cols {
    pub const OFFER_ID: u16 = 0;
    pub const TITLE: u16 = 1;
    pub const CONCATENATED_UPC: u16 = 2;
    pub const ITEM_NAME: u16 = 3;
}

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }

    /// Detect from a path extension, if it names a known format
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "xlsx" => Some(OutputFormat::Xlsx),
            "csv" => Some(OutputFormat::Csv),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Ensure `path` ends with a known output extension
///
/// A bare name like `weekly_offers` becomes `weekly_offers.xlsx` (using
/// `default`). Unknown extensions are kept and the default extension appended.
pub fn with_output_extension(path: &Path, default: OutputFormat) -> PathBuf {
    if OutputFormat::from_path(path).is_some() {
        return path.to_path_buf();
    }

    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(default.extension());
    PathBuf::from(name)
}

/// Default output path: `<stem>_concatenated.<ext>` in `dir`
pub fn default_output_path(input: &Path, dir: Option<&Path>, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("offers");
    let file_name = format!("{}_concatenated.{}", stem, format.extension());

    match dir.or_else(|| input.parent()) {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Write rows to `path`, choosing the format from its extension
pub fn write_output(rows: &[OfferRow], path: &Path) -> Result<()> {
    match OutputFormat::from_path(path).unwrap_or_default() {
        OutputFormat::Xlsx => write_xlsx(rows, path)?,
        OutputFormat::Csv => write_csv(rows, path)?,
        OutputFormat::Json => write_json(rows, path)?,
    }

    log::info!("Wrote {} offers to {}", rows.len(), path.display());
    Ok(())
}

fn write_xlsx(rows: &[OfferRow], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet.set_name(SHEET_NAME)?;
    write_header(worksheet)?;

    let top = Format::new().set_align(FormatAlign::Top);
    let wrapped = Format::new()
        .set_align(FormatAlign::Top)
        .set_text_wrap();

    for (row_idx, offer) in rows.iter().enumerate() {
        let row = (row_idx + 1) as u32;

        // Everything is a string so barcodes keep their leading zeros
        worksheet.write_string_with_format(row, cols::OFFER_ID, &offer.offer_id, &top)?;
        worksheet.write_string_with_format(row, cols::TITLE, &offer.title, &top)?;
        worksheet.write_string_with_format(
            row,
            cols::CONCATENATED_UPC,
            &offer.concatenated_upc(),
            &wrapped,
        )?;
        worksheet.write_string_with_format(
            row,
            cols::ITEM_NAME,
            &offer.item_name_lines(),
            &wrapped,
        )?;
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to save Excel file: {}", path.display()))?;

    Ok(())
}

fn write_header(ws: &mut Worksheet) -> Result<()> {
    let bold = Format::new().set_bold();

    ws.write_string_with_format(0, cols::OFFER_ID, output_cols::OFFER_ID, &bold)?;
    ws.write_string_with_format(0, cols::TITLE, output_cols::TITLE, &bold)?;
    ws.write_string_with_format(0, cols::CONCATENATED_UPC, output_cols::CONCATENATED_UPC, &bold)?;
    ws.write_string_with_format(0, cols::ITEM_NAME, output_cols::ITEM_NAME, &bold)?;

    ws.set_column_width(cols::OFFER_ID, 14)?;
    ws.set_column_width(cols::TITLE, 40)?;
    ws.set_column_width(cols::CONCATENATED_UPC, 48)?;
    ws.set_column_width(cols::ITEM_NAME, 40)?;
    ws.set_freeze_panes(1, 0)?;
    Ok(())
}

fn write_csv(rows: &[OfferRow], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    wtr.write_record(output_cols::ALL)
        .context("Failed to write CSV header")?;

    for offer in rows {
        wtr.write_record(&offer.fields())
            .with_context(|| format!("Failed to write offer: {}", offer.offer_id))?;
    }

    wtr.flush().context("Failed to flush CSV writer")?;
    Ok(())
}

fn write_json(rows: &[OfferRow], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(rows).context("Failed to format JSON output")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write output to: {}", path.display()))?;
    Ok(())
}

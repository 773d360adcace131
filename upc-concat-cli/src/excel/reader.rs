//! Read an input sheet into a [`Table`]
//!
//! Workbooks (xlsx, xlsm, xlsb, xls, ods) go through calamine; `.csv` files
//! through the csv crate. The first row is always the header.

use std::path::Path;

use anyhow::{Context, Result, bail};
use calamine::{Data, Reader, open_workbook_auto};

use crate::concat::{Cell, Table};

/// Kind of input file, by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Workbook,
    Csv,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(InputFormat::Workbook),
            "csv" => Ok(InputFormat::Csv),
            "" => bail!("Input file has no extension: {}", path.display()),
            other => bail!("Unsupported input file type '.{}': {}", other, path.display()),
        }
    }
}

/// List sheet names of an input file
///
/// A CSV file has a single sheet named after the file stem.
pub fn list_sheets(path: &Path) -> Result<Vec<String>> {
    match InputFormat::from_path(path)? {
        InputFormat::Workbook => {
            let workbook = open_workbook_auto(path)
                .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;
            Ok(workbook.sheet_names())
        }
        InputFormat::Csv => Ok(vec![
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("csv")
                .to_string(),
        ]),
    }
}

/// Read a sheet (first sheet when `sheet` is None) into a table
pub fn read_table(path: &Path, sheet: Option<&str>) -> Result<Table> {
    let table = match InputFormat::from_path(path)? {
        InputFormat::Workbook => read_workbook(path, sheet)?,
        InputFormat::Csv => {
            if let Some(sheet) = sheet {
                log::warn!("Ignoring sheet '{}' for CSV input", sheet);
            }
            read_csv(path)?
        }
    };

    log::info!(
        "Read {} rows with {} columns from {}",
        table.len(),
        table.headers().len(),
        path.display()
    );
    Ok(table)
}

fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;

    let sheet_names = workbook.sheet_names();
    let sheet_name = match sheet {
        Some(name) => {
            if !sheet_names.iter().any(|s| s == name) {
                bail!(
                    "Sheet '{}' not found in {} (available: {})",
                    name,
                    path.display(),
                    sheet_names.join(", ")
                );
            }
            name.to_string()
        }
        None => sheet_names
            .first()
            .context("Excel file has no sheets")?
            .clone(),
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(header_text).collect(),
        None => return Ok(Table::default()),
    };

    let mut table = Table::new(headers);
    for row in rows {
        let cells: Vec<Cell> = row.iter().map(data_to_cell).collect();

        // Skip empty rows
        if cells.iter().all(Cell::is_blank) {
            continue;
        }

        table.push_row(cells);
    }

    Ok(table)
}

fn read_csv(path: &Path) -> Result<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let headers: Vec<String> = rdr
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut table = Table::new(headers);
    for (idx, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read CSV record {}", idx + 1))?;
        let cells: Vec<Cell> = record
            .iter()
            .map(|field| {
                if field.trim().is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(field.to_string())
                }
            })
            .collect();

        if cells.iter().all(Cell::is_blank) {
            continue;
        }

        table.push_row(cells);
    }

    Ok(table)
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty | Data::Error(_) => String::new(),
        other => data_to_cell(other).to_text(),
    }
}

/// Convert an Excel cell to a [`Cell`]
fn data_to_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty => Cell::Empty,
        Data::String(s) if s.is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Text(format!("{}", dt)),
        Data::DateTimeIso(s) => Cell::Text(s.clone()),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) => Cell::Empty,
    }
}

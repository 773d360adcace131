//! Interactive column selection from detected headers

use anyhow::{Context, Result};
use dialoguer::Select;
use dialoguer::theme::ColorfulTheme;

use crate::concat::{ColumnRole, ColumnSelection};

/// Header names commonly used for each role, normalized (lowercase, alphanumeric only)
fn role_keywords(role: ColumnRole) -> &'static [&'static str] {
    match role {
        ColumnRole::OfferId => &["offerid", "offerno", "offernumber", "offer"],
        ColumnRole::Title => &["title", "offertitle", "headline", "offername"],
        ColumnRole::ItemName => &["itemname", "itemdescription", "item", "description", "product"],
        ColumnRole::Barcode => &["upc", "barcode", "gtin", "ean", "finalupc"],
    }
}

fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Best guess for the column of `role`, used as the prompt default
///
/// Exact keyword matches win over headers merely containing a keyword.
pub fn guess_column(role: ColumnRole, headers: &[String]) -> Option<usize> {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
    let keywords = role_keywords(role);

    for keyword in keywords {
        if let Some(idx) = normalized.iter().position(|h| h == keyword) {
            return Some(idx);
        }
    }

    for keyword in keywords {
        if let Some(idx) = normalized.iter().position(|h| h.contains(keyword)) {
            return Some(idx);
        }
    }

    None
}

/// Ask for every role that has no column yet
pub fn prompt_missing(selection: &mut ColumnSelection, headers: &[String]) -> Result<()> {
    let theme = ColorfulTheme::default();

    for role in ColumnRole::all_variants() {
        if !selection.get(*role).trim().is_empty() {
            continue;
        }

        let default = guess_column(*role, headers).unwrap_or(0);
        let idx = Select::with_theme(&theme)
            .with_prompt(format!("Select the {} column", role))
            .items(headers)
            .default(default)
            .interact()
            .with_context(|| format!("Failed to read {} column selection", role))?;

        log::debug!("Selected '{}' for {}", headers[idx], role);
        selection.set(*role, headers[idx].clone());
    }

    Ok(())
}

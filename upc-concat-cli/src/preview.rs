//! Terminal preview of consolidated offers
//!
//! Each offer spans one line per barcode, with the matching item name on the
//! same line, so a misaligned pair is visible at a glance.

use colored::*;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::concat::{OfferRow, output_cols};

const MAX_TITLE_WIDTH: usize = 40;
const MAX_ITEM_WIDTH: usize = 48;
const GAP: &str = "  ";

/// Render up to `limit` offers as an aligned text table
pub fn render_preview(rows: &[OfferRow], limit: usize) -> String {
    if rows.is_empty() {
        return format!("{}\n", "No offers to show".dimmed());
    }

    let shown = &rows[..rows.len().min(limit)];

    let id_width = column_width(
        output_cols::OFFER_ID,
        shown.iter().map(|r| r.offer_id.as_str()),
        usize::MAX,
    );
    let title_width = column_width(
        output_cols::TITLE,
        shown.iter().map(|r| r.title.as_str()),
        MAX_TITLE_WIDTH,
    );
    let upc_width = column_width(
        "UPC",
        shown.iter().flat_map(|r| r.upcs.iter().map(String::as_str)),
        usize::MAX,
    );
    let item_width = column_width(
        output_cols::ITEM_NAME,
        shown.iter().flat_map(|r| r.item_names.iter().map(String::as_str)),
        MAX_ITEM_WIDTH,
    );

    let mut out = String::new();
    let header = [
        pad(output_cols::OFFER_ID, id_width),
        pad(output_cols::TITLE, title_width),
        pad("UPC", upc_width),
        pad(output_cols::ITEM_NAME, item_width),
    ]
    .join(GAP);
    out.push_str(&format!("{}\n", header.trim_end().bold()));

    for offer in shown {
        for (i, (upc, item)) in offer.upcs.iter().zip(&offer.item_names).enumerate() {
            let (id, title) = if i == 0 {
                (offer.offer_id.as_str(), offer.title.as_str())
            } else {
                ("", "")
            };

            let line = [
                pad(id, id_width).bright_green().to_string(),
                pad(title, title_width),
                pad(upc, upc_width).cyan().to_string(),
                truncate(item, item_width),
            ]
            .join(GAP);
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }

    if rows.len() > shown.len() {
        let more = format!("… {} more offers", rows.len() - shown.len());
        out.push_str(&format!("{}\n", more.dimmed()));
    }

    out
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>, max: usize) -> usize {
    values
        .map(UnicodeWidthStr::width)
        .chain(std::iter::once(header.width()))
        .max()
        .unwrap_or(0)
        .min(max)
}

/// Truncate to `width` display columns, marking the cut with an ellipsis
fn truncate(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

fn pad(s: &str, width: usize) -> String {
    let s = truncate(s, width);
    let fill = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(fill))
}

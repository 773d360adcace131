//! Offer consolidation: normalize barcodes and titles, then collapse rows
//! into one row per (offer id, title)

mod engine;
mod normalize;
mod selection;
mod table;

pub use engine::{OfferRow, TransformReport, output_cols, transform};
pub use selection::{ColumnRole, ColumnSelection, ValidationError};
pub use table::{Cell, Table};

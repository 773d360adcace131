//! Spreadsheet I/O for offer tables

mod reader;
mod writer;

pub use reader::{list_sheets, read_table};
pub use writer::{OutputFormat, default_output_path, with_output_extension, write_output};

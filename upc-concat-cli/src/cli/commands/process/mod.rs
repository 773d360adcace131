//! `process` command: consolidate offers into one row per offer

mod handler;
mod prompt;

use std::path::PathBuf;

use clap::Args;

use crate::excel::OutputFormat;

pub use handler::handle_process_command;
pub use prompt::guess_column;

#[derive(Args, Debug)]
pub struct ProcessCommands {
    /// Input spreadsheet (xlsx, xlsm, xlsb, xls, ods or csv)
    pub input: PathBuf,

    /// Sheet to read (defaults to the first sheet)
    #[arg(short, long)]
    pub sheet: Option<String>,

    /// Column holding the offer id
    #[arg(long, value_name = "COLUMN")]
    pub offer_id: Option<String>,

    /// Column holding the offer title
    #[arg(long, value_name = "COLUMN")]
    pub title: Option<String>,

    /// Column holding the item name
    #[arg(long, value_name = "COLUMN")]
    pub item_name: Option<String>,

    /// Column holding the UPC / barcode
    #[arg(long, value_name = "COLUMN")]
    pub barcode: Option<String>,

    /// Output file; a bare name gets the format's extension
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format when the output path does not name one
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Print the consolidated offers to the terminal
    #[arg(short, long)]
    pub preview: bool,

    /// Never prompt for missing column selections
    #[arg(long)]
    pub non_interactive: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

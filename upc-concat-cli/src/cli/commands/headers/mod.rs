//! `headers` command: list sheets and detected column headers

mod handler;

use std::path::PathBuf;

use clap::Args;

pub use handler::handle_headers_command;

#[derive(Args, Debug)]
pub struct HeadersCommands {
    /// Input spreadsheet (xlsx, xlsm, xlsb, xls, ods or csv)
    pub input: PathBuf,

    /// Sheet to inspect (defaults to the first sheet)
    #[arg(short, long)]
    pub sheet: Option<String>,
}

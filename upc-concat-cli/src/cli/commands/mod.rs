pub mod headers;
pub mod process;

pub use headers::HeadersCommands;
pub use process::ProcessCommands;

//! Input normalization shared by the router and the fallback engine.

pub mod parser;
pub mod types;

pub use parser::{is_help_request, is_quit_command, parse};
pub use types::ParsedCommand;

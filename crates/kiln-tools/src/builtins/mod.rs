//! Built-in project tools

pub mod file_write;
pub mod security;

pub use file_write::{FileWriteTool, FILE_WRITE_TOOL_NAME};
pub use security::resolve_within;

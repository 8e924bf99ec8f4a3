//! Kiln Tools - Tool Registry and Project Tools
//!
//! This crate provides the tools a generation session can expose to the model:
//! - Registry: tools keyed by name, their definitions and call dispatch
//! - Builtins: Project tools bound to a sandbox directory (file write)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod builtins;
pub mod error;
pub mod registry;

pub use builtins::FileWriteTool;
pub use error::{Error, Result};
pub use registry::{Tool, ToolOutput, ToolRegistry};

//! Routing - output type to model and tools
//!
//! - `policy`: route table and lookup
//! - `hallucination`: answers to tool calls naming tools that do not exist

mod hallucination;
mod policy;

pub use hallucination::missing_tool_response;
pub use policy::{GenerationRoute, RoutingConfig, RoutingPolicy, ToolSet};

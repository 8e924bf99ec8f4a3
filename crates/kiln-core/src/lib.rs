//! Kiln Core - Generation Session Orchestration
//!
//! This crate ties the model boundary, conversation memory and tools together:
//! - Routing: output type → model and tool set
//! - Session: cached, ready-to-invoke generation sessions per application
//! - Result: structured generation results and model-output parsing
//! - Saver: validation and persistence of results to the artifact directory
//! - Service: the end-to-end generate / reset flow used by front ends

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod codegen_type;
pub mod error;
pub mod result;
pub mod routing;
pub mod saver;
pub mod service;
pub mod session;

pub use codegen_type::{CacheKey, CodeGenType};
pub use error::{format_error_for_cli, Error, Result, UserFriendlyError};
pub use result::{GenerationResult, HtmlCodeResult, MultiFileCodeResult};
pub use routing::{missing_tool_response, GenerationRoute, RoutingConfig, RoutingPolicy, ToolSet};
pub use saver::{
    artifact_dir, CodeFileSaver, CodeSaverExecutor, HtmlCodeSaver, MultiFileCodeSaver,
    SavedArtifactSet,
};
pub use service::{GenerationOutcome, GenerationRequest, GenerationService};
pub use session::{
    system_prompt, EvictionCause, EvictionNotice, GenerationSession, ProjectEvent,
    ProjectOutcome, SessionCache, SessionCacheConfig, SessionFactory,
    DEFAULT_MAX_TOOL_ITERATIONS,
};

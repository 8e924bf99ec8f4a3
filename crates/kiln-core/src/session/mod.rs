//! Session - cached, ready-to-invoke generation sessions
//!
//! - `factory`: assembles a session from its route, provider, tools and
//!   replayed history
//! - `cache`: bounded, time-expiring store with one build per key at a time
//! - `session` / `project`: chat and tool-loop invocations
//! - `eviction`: removal notices

mod cache;
mod eviction;
mod factory;
mod project;
mod prompts;
#[allow(clippy::module_inception)]
mod session;

pub use cache::{SessionCache, SessionCacheConfig};
pub use eviction::{EvictionCause, EvictionNotice};
pub use factory::{SessionFactory, DEFAULT_MAX_TOOL_ITERATIONS};
pub use project::{ProjectEvent, ProjectOutcome};
pub use prompts::system_prompt;
pub use session::GenerationSession;

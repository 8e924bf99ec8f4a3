//! Router - LLM Provider abstraction and lookup
//!
//! This module defines the core trait for LLM providers, the configuration
//! types used to select one, and the registry that resolves a provider by name.
//!
//! # Module Structure
//!
//! - `config`: Provider and model configuration
//! - `provider`: LlmProvider trait definition
//! - `mock`: Mock provider for testing
//! - `router_impl`: LlmRouter, the provider registry

mod config;
mod mock;
mod provider;
mod router_impl;


pub use crate::completion::{
    CompletionRequest, CompletionResponse, TokenUsage, ToolCompletionRequest,
    ToolCompletionResponse,
};
pub use crate::message::{Message, MessageRole};
pub use crate::tools::{ToolCall, ToolDefinition};

pub use config::{ModelConfig, ProviderConfig};
pub use mock::MockProvider;
pub use provider::LlmProvider;
pub use router_impl::LlmRouter;

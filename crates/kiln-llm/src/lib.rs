//! Kiln LLM - Model Invocation Boundary
//!
//! This crate provides the LLM integration used by Kiln's generation sessions:
//! - Router: Provider trait definition and name-based provider lookup
//! - OpenAI-compatible: Chat completions over any OpenAI-style endpoint
//!   (OpenAI, DeepSeek, local gateways)
//! - Mock: Queued responses for tests and offline runs

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod completion;
pub mod error;
pub mod message;
pub mod openai_compat;
pub mod router;
pub mod tools;
pub mod util;

pub use error::{Error, Result};
pub use router::{
    CompletionRequest, CompletionResponse, LlmProvider, LlmRouter, Message, MessageRole,
    MockProvider, ModelConfig, ProviderConfig, TokenUsage, ToolCall, ToolCompletionRequest,
    ToolCompletionResponse, ToolDefinition,
};

pub use openai_compat::{OpenAiCompatConfig, OpenAiCompatProvider};

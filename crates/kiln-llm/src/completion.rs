//! Requests to and replies from a chat model

use crate::message::Message;
use crate::router::ModelConfig;
use crate::tools::{ToolCall, ToolDefinition};
use serde::{Deserialize, Serialize};

/// Token counts reported by the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Prompt tokens
    pub prompt_tokens: u32,
    /// Completion tokens
    pub completion_tokens: u32,
    /// Total tokens
    pub total_tokens: u32,
}

/// A chat completion request
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    /// Model name; empty selects the provider's default model
    pub model: String,
    /// Conversation, system prompt first
    pub messages: Vec<Message>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Ask for a JSON object reply
    pub json_mode: bool,
}

impl CompletionRequest {
    /// Empty request for a model name
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Empty request carrying a model configuration's name and sampling
    #[must_use]
    pub fn for_model(model: &ModelConfig) -> Self {
        Self {
            model: model.model.clone(),
            max_tokens: model.max_tokens,
            temperature: model.temperature,
            ..Default::default()
        }
    }

    /// Append a message
    #[must_use]
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Append messages in order
    #[must_use]
    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages.extend(messages);
        self
    }

    /// Request a JSON object reply
    #[must_use]
    pub fn with_json_mode(mut self, json_mode: bool) -> Self {
        self.json_mode = json_mode;
        self
    }
}

/// Reply to a plain completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated text
    pub content: String,
    /// Token counts, when reported
    pub usage: Option<TokenUsage>,
    /// Model that answered
    pub model: String,
}

/// A completion request offering tools; the model decides whether to call them
#[derive(Debug, Clone)]
pub struct ToolCompletionRequest {
    /// Base request
    pub request: CompletionRequest,
    /// Offered tools
    pub tools: Vec<ToolDefinition>,
}

impl ToolCompletionRequest {
    /// Offer `tools` with `request`
    #[must_use]
    pub fn new(request: CompletionRequest, tools: Vec<ToolDefinition>) -> Self {
        Self { request, tools }
    }
}

/// Reply to a tool completion: either tool calls or a final text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCompletionResponse {
    /// Text content, if any
    pub content: Option<String>,
    /// Requested calls, in the order the model listed them
    pub tool_calls: Vec<ToolCall>,
    /// Token counts, when reported
    pub usage: Option<TokenUsage>,
    /// Model that answered
    pub model: String,
}

impl ToolCompletionResponse {
    /// A reply asking for `calls`
    #[must_use]
    pub fn calls(model: impl Into<String>, calls: Vec<ToolCall>) -> Self {
        Self {
            content: None,
            tool_calls: calls,
            usage: None,
            model: model.into(),
        }
    }

    /// A final reply without tool calls
    #[must_use]
    pub fn text(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
            usage: None,
            model: model.into(),
        }
    }

    /// Whether the model asked for tools
    #[must_use]
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

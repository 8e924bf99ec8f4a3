//! Mock LLM Provider for testing
//!
//! Responses are served from FIFO queues; every request is recorded so tests
//! can assert on the conversation context a session sent.

use super::provider::LlmProvider;
use crate::completion::{
    CompletionRequest, CompletionResponse, ToolCompletionRequest, ToolCompletionResponse,
};
use crate::error::{Error, Result};

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

const MOCK_MODEL: &str = "mock-model";

/// Reply served when a queue is empty
const FALLBACK_REPLY: &str = "mock response";

enum Queued<T> {
    Ok(T),
    Err(String),
}

/// A mock LLM provider that returns queued responses or default ones.
#[derive(Default)]
pub struct MockProvider {
    text: Arc<Mutex<VecDeque<Queued<String>>>>,
    tool: Arc<Mutex<VecDeque<Queued<ToolCompletionResponse>>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockProvider {
    /// Create a new mock provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the content of the next `complete` response.
    pub fn add_text_response(&self, content: impl Into<String>) {
        self.text
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Queued::Ok(content.into()));
    }

    /// Make the next `complete` call fail with a provider error.
    pub fn add_text_failure(&self, message: impl Into<String>) {
        self.text
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Queued::Err(message.into()));
    }

    /// Queue the next `complete_with_tools` response.
    pub fn add_tool_response(&self, response: ToolCompletionResponse) {
        self.tool
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Queued::Ok(response));
    }

    /// Make the next `complete_with_tools` call fail with a provider error.
    pub fn add_tool_failure(&self, message: impl Into<String>) {
        self.tool
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Queued::Err(message.into()));
    }

    /// Requests received so far, in call order.
    #[must_use]
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn record(&self, request: CompletionRequest) {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);
    }
}

#[async_trait::async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn supports_tools(&self) -> bool {
        true
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.record(request);
        let next = self
            .text
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        match next {
            Some(Queued::Err(message)) => Err(Error::provider(message)),
            Some(Queued::Ok(content)) => Ok(CompletionResponse {
                content,
                usage: None,
                model: MOCK_MODEL.to_string(),
            }),
            None => Ok(CompletionResponse {
                content: FALLBACK_REPLY.to_string(),
                usage: None,
                model: MOCK_MODEL.to_string(),
            }),
        }
    }

    async fn complete_with_tools(
        &self,
        request: ToolCompletionRequest,
    ) -> Result<ToolCompletionResponse> {
        self.record(request.request);
        let next = self
            .tool
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        match next {
            Some(Queued::Err(message)) => Err(Error::provider(message)),
            Some(Queued::Ok(response)) => Ok(response),
            None => Ok(ToolCompletionResponse::text(MOCK_MODEL, FALLBACK_REPLY)),
        }
    }
}

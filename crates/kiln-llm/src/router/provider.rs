//! The provider seam
//!
//! Sessions hold an `Arc<dyn LlmProvider>` resolved once at build time and
//! call it for every exchange.

use crate::completion::{
    CompletionRequest, CompletionResponse, ToolCompletionRequest, ToolCompletionResponse,
};
use crate::error::Result;

/// A chat model endpoint
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Name the provider is registered under
    fn name(&self) -> &str;

    /// Whether [`complete_with_tools`](Self::complete_with_tools) can be used.
    /// Project sessions refuse providers without it.
    fn supports_tools(&self) -> bool;

    /// Plain completion
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Completion offering tools
    async fn complete_with_tools(
        &self,
        request: ToolCompletionRequest,
    ) -> Result<ToolCompletionResponse>;
}

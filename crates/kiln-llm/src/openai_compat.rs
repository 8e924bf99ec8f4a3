//! OpenAI-compatible chat completions provider
//!
//! Speaks the `/chat/completions` wire format shared by OpenAI, DeepSeek and
//! most self-hosted gateways. The same type backs both the direct chat model
//! used for page generation and the reasoning model used for project builds;
//! they differ only in base URL and model name.

use crate::error::{Error, Result};
use crate::router::{
    CompletionRequest, CompletionResponse, LlmProvider, Message, ProviderConfig, TokenUsage,
    ToolCall, ToolCompletionRequest, ToolCompletionResponse, ToolDefinition,
};
use crate::util::{mask_api_key, sanitize_api_error};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Provider configuration
#[derive(Clone)]
pub struct OpenAiCompatConfig {
    /// Provider name as registered in the router
    pub name: String,
    /// API key
    pub api_key: String,
    /// Base URL
    pub base_url: String,
    /// Default model
    pub default_model: String,
    /// Request timeout
    pub timeout: Duration,
}

// SECURITY: Custom Debug implementation to mask API key
impl fmt::Debug for OpenAiCompatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiCompatConfig")
            .field("name", &self.name)
            .field("api_key", &mask_api_key(&self.api_key))
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl OpenAiCompatConfig {
    /// Create a new configuration with an API key
    #[must_use]
    pub fn new(name: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            api_key: api_key.into(),
            base_url: DEFAULT_API_BASE.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Create configuration from `{PREFIX}_API_KEY`, `{PREFIX}_BASE_URL` and
    /// `{PREFIX}_MODEL` environment variables.
    pub fn from_env(name: impl Into<String>, prefix: &str) -> Result<Self> {
        let key_var = format!("{prefix}_API_KEY");
        let api_key = std::env::var(&key_var)
            .map_err(|_| Error::NotConfigured(format!("{key_var} not set")))?;

        let mut config = Self::new(name, api_key);
        if let Ok(base_url) = std::env::var(format!("{prefix}_BASE_URL")) {
            config.base_url = base_url;
        }
        if let Ok(model) = std::env::var(format!("{prefix}_MODEL")) {
            config.default_model = model;
        }
        Ok(config)
    }

    /// Build from a router provider section; the key may come from `env_key`.
    pub fn from_provider_config(
        name: impl Into<String>,
        provider: &ProviderConfig,
        env_key: &str,
    ) -> Result<Self> {
        let name = name.into();
        let api_key = provider
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var(env_key).ok())
            .ok_or_else(|| Error::NotConfigured(format!("{name}: {env_key} not set")))?;

        let mut config = Self::new(name, api_key).with_timeout(provider.timeout());
        if let Some(base_url) = &provider.base_url {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(model) = &provider.default_model {
            config.default_model = model.clone();
        }
        Ok(config)
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the default model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Set the timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// OpenAI-compatible provider
pub struct OpenAiCompatProvider {
    client: Client,
    config: OpenAiCompatConfig,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ChatTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<ChatOutgoingToolCall>,
}

#[derive(Serialize)]
struct ChatOutgoingToolCall {
    id: String,
    r#type: &'static str,
    function: ChatToolCallFunction,
}

#[derive(Serialize)]
struct ChatTool {
    r#type: String,
    function: ChatFunction,
}

#[derive(Serialize)]
struct ChatFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
    model: String,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ChatToolCall>>,
}

#[derive(Deserialize)]
struct ChatToolCall {
    id: String,
    function: ChatToolCallFunction,
}

#[derive(Serialize, Deserialize)]
struct ChatToolCallFunction {
    name: String,
    arguments: String,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

impl OpenAiCompatProvider {
    /// Create a new provider
    pub fn new(config: OpenAiCompatConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &OpenAiCompatConfig {
        &self.config
    }

    fn convert_message(msg: &Message) -> ChatMessage {
        ChatMessage {
            role: msg.role.as_str().to_string(),
            content: msg.content.clone(),
            tool_call_id: msg.tool_call_id.clone(),
            name: msg.name.clone(),
            tool_calls: msg
                .tool_calls
                .iter()
                .map(|tc| ChatOutgoingToolCall {
                    id: tc.id.clone(),
                    r#type: "function",
                    function: ChatToolCallFunction {
                        name: tc.name.clone(),
                        arguments: tc.arguments.clone(),
                    },
                })
                .collect(),
        }
    }

    fn convert_tool(tool: &ToolDefinition) -> ChatTool {
        ChatTool {
            r#type: "function".to_string(),
            function: ChatFunction {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.parameters.clone(),
            },
        }
    }

    fn build_request(&self, request: &CompletionRequest) -> ChatRequest {
        let model = if request.model.is_empty() {
            self.config.default_model.clone()
        } else {
            request.model.clone()
        };

        ChatRequest {
            model,
            messages: request.messages.iter().map(Self::convert_message).collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            response_format: request
                .json_mode
                .then(|| serde_json::json!({"type": "json_object"})),
            tools: None,
            tool_choice: None,
        }
    }

    fn build_tool_request(&self, request: &ToolCompletionRequest) -> ChatRequest {
        let mut chat_request = self.build_request(&request.request);
        if !request.tools.is_empty() {
            chat_request.tools = Some(request.tools.iter().map(Self::convert_tool).collect());
            // The model decides whether to call a tool or finish
            chat_request.tool_choice = Some("auto");
        }
        chat_request
    }

    async fn send(&self, chat_request: &ChatRequest) -> Result<ChatResponse> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(chat_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::TimedOut(self.config.timeout)
                } else {
                    Error::Transport(sanitize_api_error(&e.to_string()))
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited);
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::Status {
                status: status.as_u16(),
                message: sanitize_api_error(&error_text),
            });
        }

        response
            .json()
            .await
            .map_err(|e| Error::MalformedReply(e.to_string()))
    }

    fn convert_usage(usage: Option<ChatUsage>) -> Option<TokenUsage> {
        let usage = usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });
        if let Some(u) = &usage {
            debug!(
                prompt_tokens = u.prompt_tokens,
                completion_tokens = u.completion_tokens,
                "Token usage"
            );
        }
        usage
    }
}

#[async_trait::async_trait]
impl LlmProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn supports_tools(&self) -> bool {
        true
    }

    #[instrument(skip(self, request), fields(provider = %self.config.name, model = %request.model))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let chat_request = self.build_request(&request);

        debug!(messages = chat_request.messages.len(), "Sending chat request");
        let chat_response = self.send(&chat_request).await?;

        let choice = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::MalformedReply("no choices in reply".to_string()))?;

        Ok(CompletionResponse {
            content: choice.message.content.unwrap_or_default(),
            usage: Self::convert_usage(chat_response.usage),
            model: chat_response.model,
        })
    }

    #[instrument(
        skip(self, request),
        fields(provider = %self.config.name, model = %request.request.model, tools = request.tools.len())
    )]
    async fn complete_with_tools(
        &self,
        request: ToolCompletionRequest,
    ) -> Result<ToolCompletionResponse> {
        let chat_request = self.build_tool_request(&request);

        debug!(messages = chat_request.messages.len(), "Sending tool request");
        let chat_response = self.send(&chat_request).await?;

        let choice = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::MalformedReply("no choices in reply".to_string()))?;

        let tool_calls: Vec<ToolCall> = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| ToolCall {
                id: tc.id,
                name: tc.function.name,
                arguments: tc.function.arguments,
            })
            .collect();

        Ok(ToolCompletionResponse {
            content: choice.message.content,
            tool_calls,
            usage: Self::convert_usage(chat_response.usage),
            model: chat_response.model,
        })
    }
}

//! Provider registry
//!
//! Providers are registered by name at start-up; a model configuration
//! names the one it runs on, or leaves the name empty for the default.

use super::config::ModelConfig;
use super::provider::LlmProvider;
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Registered providers and the default among them
pub struct LlmRouter {
    providers: BTreeMap<String, Arc<dyn LlmProvider>>,
    default_provider: String,
}

impl LlmRouter {
    /// Create an empty router whose default is `default_provider`
    #[must_use]
    pub fn new(default_provider: impl Into<String>) -> Self {
        Self {
            providers: BTreeMap::new(),
            default_provider: default_provider.into(),
        }
    }

    /// Register a provider, replacing any of the same name
    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn LlmProvider>) {
        let name = name.into();
        debug!(provider = %name, "Registering LLM provider");
        self.providers.insert(name, provider);
    }

    /// Whether a provider of that name is registered
    #[must_use]
    pub fn has_provider(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Registered names, sorted
    #[must_use]
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.keys().map(String::as_str).collect()
    }

    /// Provider a model configuration runs on
    pub fn resolve(&self, model: &ModelConfig) -> Result<Arc<dyn LlmProvider>> {
        let name = if model.provider.is_empty() {
            self.default_provider.as_str()
        } else {
            model.provider.as_str()
        };
        self.providers
            .get(name)
            .cloned()
            .ok_or_else(|| Error::NotConfigured(name.to_string()))
    }
}

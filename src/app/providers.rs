//! LLM provider resolution
//!
//! Registers every enabled provider section that has an API key.

use super::config::LlmConfig;
use kiln_llm::{LlmRouter, OpenAiCompatConfig, OpenAiCompatProvider};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Build the provider registry.
///
/// A provider named `deepseek` takes its key from `api_key` or, when that is
/// empty, from `DEEPSEEK_API_KEY`.
pub fn resolve_llm_router(llm_config: &LlmConfig) -> Arc<LlmRouter> {
    let mut router = LlmRouter::new(&llm_config.default_provider);

    let mut names: Vec<&String> = llm_config.providers.keys().collect();
    names.sort();

    for name in names {
        let section = &llm_config.providers[name];
        if !section.enabled {
            debug!(provider = %name, "Provider disabled");
            continue;
        }
        let env_key = format!("{}_API_KEY", name.to_uppercase());
        let provider = OpenAiCompatConfig::from_provider_config(name.as_str(), section, &env_key)
            .and_then(OpenAiCompatProvider::new);
        match provider {
            Ok(provider) => {
                router.register(name.as_str(), Arc::new(provider));
                info!(provider = %name, "Registered LLM provider");
            }
            Err(e) => debug!(provider = %name, error = %e, "Provider not available"),
        }
    }

    info!(providers = ?router.provider_names(), "LLM providers ready");
    if !router.has_provider(&llm_config.default_provider) {
        warn!(
            provider = %llm_config.default_provider,
            "Default LLM provider is not configured; set its API key to generate"
        );
    }

    Arc::new(router)
}

//! Application configuration types

use kiln_core::{RoutingConfig, SessionCacheConfig};
use kiln_llm::ProviderConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
}

/// Where artifacts are written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub root: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./generated"),
        }
    }
}

/// Session cache limits, in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub max_capacity: u64,
    pub time_to_live_secs: u64,
    pub time_to_idle_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        let defaults = SessionCacheConfig::default();
        Self {
            max_capacity: defaults.max_capacity,
            time_to_live_secs: defaults.time_to_live.as_secs(),
            time_to_idle_secs: defaults.time_to_idle.as_secs(),
        }
    }
}

impl CacheConfig {
    pub fn to_session_cache_config(&self) -> SessionCacheConfig {
        SessionCacheConfig {
            max_capacity: self.max_capacity,
            time_to_live: Duration::from_secs(self.time_to_live_secs),
            time_to_idle: Duration::from_secs(self.time_to_idle_secs),
        }
    }
}

/// Conversation window sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub window_size: usize,
    pub replay_count: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            window_size: kiln_memory::DEFAULT_WINDOW_SIZE,
            replay_count: kiln_memory::DEFAULT_WINDOW_SIZE,
        }
    }
}

/// History storage backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryBackend {
    #[default]
    Sqlite,
    Memory,
}

/// Chat history storage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default)]
    pub backend: HistoryBackend,
    /// SQLite file; `~/.kiln/history.db` when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Project generation limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub max_tool_iterations: usize,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            max_tool_iterations: kiln_core::DEFAULT_MAX_TOOL_ITERATIONS,
        }
    }
}

/// LLM providers by name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub default_provider: String,
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            default_provider: "deepseek".to_string(),
            providers: HashMap::new(),
        }
    }
}

//! Session cache
//!
//! Bounded by entry count, expiring both a fixed time after insertion and a
//! fixed time after the last read. Concurrent misses on one key share a single
//! build; a failed build is returned to every waiter and nothing is cached.

use super::eviction::{EvictionCause, EvictionNotice};
use super::factory::SessionFactory;
use super::session::GenerationSession;
use crate::codegen_type::{CacheKey, CodeGenType};
use crate::error::{Error, Result};
use kiln_memory::AppId;
use moka::future::Cache;
use moka::notification::RemovalCause;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, instrument};

/// Cache limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCacheConfig {
    /// Maximum cached sessions
    pub max_capacity: u64,
    /// Lifetime after insertion
    pub time_to_live: Duration,
    /// Lifetime after the last read
    pub time_to_idle: Duration,
}

impl Default for SessionCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 1000,
            time_to_live: Duration::from_secs(30 * 60),
            time_to_idle: Duration::from_secs(10 * 60),
        }
    }
}

/// Sessions keyed by application and output type
pub struct SessionCache {
    inner: Cache<CacheKey, Arc<GenerationSession>>,
    factory: Arc<SessionFactory>,
    config: SessionCacheConfig,
}

impl SessionCache {
    /// Create a cache that builds sessions with `factory`
    #[must_use]
    pub fn new(factory: Arc<SessionFactory>, config: SessionCacheConfig) -> Self {
        Self::build(factory, config, None)
    }

    /// Create a cache that also reports every removal on the returned channel
    #[must_use]
    pub fn with_notices(
        factory: Arc<SessionFactory>,
        config: SessionCacheConfig,
    ) -> (Self, UnboundedReceiver<EvictionNotice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::build(factory, config, Some(tx)), rx)
    }

    fn build(
        factory: Arc<SessionFactory>,
        config: SessionCacheConfig,
        notices: Option<UnboundedSender<EvictionNotice>>,
    ) -> Self {
        let ttl = config.time_to_live;
        let tti = config.time_to_idle;

        let listener =
            move |key: Arc<CacheKey>, session: Arc<GenerationSession>, cause: RemovalCause| {
                let cause = EvictionCause::classify(
                    cause,
                    session.created_at(),
                    session.last_access(),
                    ttl,
                    tti,
                );
                debug!(
                    key = %key,
                    session_id = %session.id(),
                    cause = %cause,
                    "Generation session removed from cache"
                );
                if let Some(tx) = &notices {
                    let _ = tx.send(EvictionNotice { key: *key, cause });
                }
            };

        let inner = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(ttl)
            .time_to_idle(tti)
            .eviction_listener(listener)
            .build();

        Self {
            inner,
            factory,
            config,
        }
    }

    /// Cached session for the key, building it on a miss
    #[instrument(skip(self))]
    pub async fn get(
        &self,
        app_id: AppId,
        code_gen_type: CodeGenType,
    ) -> Result<Arc<GenerationSession>> {
        let key = CacheKey::new(app_id, code_gen_type);
        let factory = Arc::clone(&self.factory);
        let session = self
            .inner
            .try_get_with(key, async move { factory.build(key).await.map(Arc::new) })
            .await
            .map_err(Error::from_shared)?;
        session.touch();
        Ok(session)
    }

    /// Drop one key
    pub async fn invalidate(&self, key: &CacheKey) {
        self.inner.invalidate(key).await;
    }

    /// Drop every session of an application
    pub async fn invalidate_app(&self, app_id: AppId) {
        for code_gen_type in CodeGenType::ALL {
            self.inner
                .invalidate(&CacheKey::new(app_id, code_gen_type))
                .await;
        }
    }

    /// Approximate number of cached sessions
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Apply pending expirations and removals now
    pub async fn run_pending_tasks(&self) {
        self.inner.run_pending_tasks().await;
    }

    /// Limits the cache was built with
    #[must_use]
    pub fn config(&self) -> &SessionCacheConfig {
        &self.config
    }

    /// Factory used on misses
    #[must_use]
    pub fn factory(&self) -> &SessionFactory {
        &self.factory
    }
}

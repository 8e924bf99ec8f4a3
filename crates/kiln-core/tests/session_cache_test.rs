//! Session cache: identity, expiry, single-flight builds and eviction notices

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kiln_core::{
    CacheKey, CodeGenType, Error, EvictionCause, EvictionNotice, RoutingConfig, RoutingPolicy,
    SessionCache, SessionCacheConfig, SessionFactory,
};
use kiln_llm::{LlmRouter, MessageRole, MockProvider, ModelConfig};
use kiln_memory::{
    AppId, HistoryEntry, HistoryLog, InMemoryHistoryLog, MemoryBridge, MessageType, UserId,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

fn mock_routes() -> RoutingConfig {
    RoutingConfig::uniform(ModelConfig::new("mock", "mock-model"))
}

fn factory(
    routes: RoutingConfig,
    log: Arc<dyn HistoryLog>,
    provider: Arc<MockProvider>,
    root: &std::path::Path,
) -> Arc<SessionFactory> {
    let mut llm = LlmRouter::new("mock");
    llm.register("mock", provider);
    Arc::new(SessionFactory::new(
        RoutingPolicy::new(routes),
        Arc::new(llm),
        MemoryBridge::new(log),
        root,
    ))
}

fn default_cache(config: SessionCacheConfig) -> (SessionCache, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let factory = factory(
        mock_routes(),
        Arc::new(InMemoryHistoryLog::new()),
        Arc::new(MockProvider::new()),
        dir.path(),
    );
    (SessionCache::new(factory, config), dir)
}

/// History log that counts and slows down replay queries
#[derive(Default)]
struct CountingHistory {
    queries: AtomicUsize,
}

#[async_trait]
impl HistoryLog for CountingHistory {
    async fn append(
        &self,
        _app_id: AppId,
        _message: &str,
        _message_type: MessageType,
        _user_id: UserId,
    ) -> kiln_memory::Result<HistoryEntry> {
        Err(kiln_memory::Error::Internal("read-only".to_string()))
    }

    async fn delete_all(&self, _app_id: AppId) -> kiln_memory::Result<u64> {
        Ok(0)
    }

    async fn query_recent(
        &self,
        _app_id: AppId,
        _limit: usize,
        _before: Option<DateTime<Utc>>,
    ) -> kiln_memory::Result<Vec<HistoryEntry>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok(Vec::new())
    }
}

/// History log whose replay for app 1 waits until released
#[derive(Default)]
struct GatedHistory {
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl HistoryLog for GatedHistory {
    async fn append(
        &self,
        _app_id: AppId,
        _message: &str,
        _message_type: MessageType,
        _user_id: UserId,
    ) -> kiln_memory::Result<HistoryEntry> {
        Err(kiln_memory::Error::Internal("read-only".to_string()))
    }

    async fn delete_all(&self, _app_id: AppId) -> kiln_memory::Result<u64> {
        Ok(0)
    }

    async fn query_recent(
        &self,
        app_id: AppId,
        _limit: usize,
        _before: Option<DateTime<Utc>>,
    ) -> kiln_memory::Result<Vec<HistoryEntry>> {
        if app_id == 1 {
            self.entered.notify_one();
            self.release.notified().await;
        }
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn test_hit_returns_same_session() {
    let (cache, _dir) = default_cache(SessionCacheConfig::default());

    let first = cache.get(1, CodeGenType::Html).await.unwrap();
    let second = cache.get(1, CodeGenType::Html).await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let other_type = cache.get(1, CodeGenType::MultiFile).await.unwrap();
    let other_app = cache.get(2, CodeGenType::Html).await.unwrap();
    assert!(!Arc::ptr_eq(&first, &other_type));
    assert!(!Arc::ptr_eq(&first, &other_app));

    cache.run_pending_tasks().await;
    assert_eq!(cache.entry_count(), 3);
}

#[tokio::test]
async fn test_project_session_gets_file_tool() {
    let (cache, dir) = default_cache(SessionCacheConfig::default());

    let project = cache.get(5, CodeGenType::VueProject).await.unwrap();
    assert_eq!(project.tool_names(), vec!["write_file"]);
    assert_eq!(project.project_dir(), dir.path().join("5_vue_project"));

    let html = cache.get(5, CodeGenType::Html).await.unwrap();
    assert!(html.tool_names().is_empty());
}

#[tokio::test]
async fn test_write_ttl_builds_fresh_session() {
    let dir = tempfile::tempdir().unwrap();
    let factory = factory(
        mock_routes(),
        Arc::new(InMemoryHistoryLog::new()),
        Arc::new(MockProvider::new()),
        dir.path(),
    );
    let config = SessionCacheConfig {
        max_capacity: 10,
        time_to_live: Duration::from_millis(200),
        time_to_idle: Duration::from_secs(5),
    };
    let (cache, mut notices) = SessionCache::with_notices(factory, config);

    let first = cache.get(3, CodeGenType::Html).await.unwrap();
    tokio::time::sleep(Duration::from_millis(350)).await;
    cache.run_pending_tasks().await;

    assert_eq!(
        notices.try_recv().unwrap(),
        EvictionNotice {
            key: CacheKey::new(3, CodeGenType::Html),
            cause: EvictionCause::ExpiredWrite,
        }
    );
    assert!(notices.try_recv().is_err());

    let second = cache.get(3, CodeGenType::Html).await.unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert_ne!(first.id(), second.id());
}

#[tokio::test]
async fn test_idle_ttl_reports_access_expiry() {
    let dir = tempfile::tempdir().unwrap();
    let factory = factory(
        mock_routes(),
        Arc::new(InMemoryHistoryLog::new()),
        Arc::new(MockProvider::new()),
        dir.path(),
    );
    let config = SessionCacheConfig {
        max_capacity: 10,
        time_to_live: Duration::from_secs(5),
        time_to_idle: Duration::from_millis(150),
    };
    let (cache, mut notices) = SessionCache::with_notices(factory, config);

    cache.get(4, CodeGenType::MultiFile).await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    cache.run_pending_tasks().await;

    let notice = notices.try_recv().unwrap();
    assert_eq!(notice.key, CacheKey::new(4, CodeGenType::MultiFile));
    assert_eq!(notice.cause, EvictionCause::ExpiredAccess);
    assert_eq!(cache.entry_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_misses_build_once() {
    let dir = tempfile::tempdir().unwrap();
    let history = Arc::new(CountingHistory::default());
    let factory = factory(
        mock_routes(),
        history.clone(),
        Arc::new(MockProvider::new()),
        dir.path(),
    );
    let cache = Arc::new(SessionCache::new(factory, SessionCacheConfig::default()));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.get(9, CodeGenType::Html).await.unwrap() })
        })
        .collect();

    let mut sessions = Vec::new();
    for handle in handles {
        sessions.push(handle.await.unwrap());
    }

    assert_eq!(history.queries.load(Ordering::SeqCst), 1);
    assert!(sessions.iter().all(|s| Arc::ptr_eq(s, &sessions[0])));
}

#[tokio::test]
async fn test_failed_build_is_not_cached() {
    let dir = tempfile::tempdir().unwrap();
    let routes = RoutingConfig {
        html: Some(ModelConfig::new("absent", "x")),
        multi_file: Some(ModelConfig::new("mock", "mock-model")),
        vue_project: None,
    };
    let factory = factory(
        routes,
        Arc::new(InMemoryHistoryLog::new()),
        Arc::new(MockProvider::new()),
        dir.path(),
    );
    let cache = SessionCache::new(factory, SessionCacheConfig::default());

    for _ in 0..2 {
        let err = cache.get(1, CodeGenType::Html).await.unwrap_err();
        assert!(matches!(
            err.root(),
            Error::Llm(kiln_llm::Error::NotConfigured(name)) if name == "absent"
        ));
    }

    let err = cache.get(1, CodeGenType::VueProject).await.unwrap_err();
    assert!(matches!(err.root(), Error::UnsupportedGenerationType(v) if v == "vue_project"));

    cache.run_pending_tasks().await;
    assert_eq!(cache.entry_count(), 0);
}

#[tokio::test]
async fn test_invalidate_app_drops_every_type() {
    let dir = tempfile::tempdir().unwrap();
    let factory = factory(
        mock_routes(),
        Arc::new(InMemoryHistoryLog::new()),
        Arc::new(MockProvider::new()),
        dir.path(),
    );
    let (cache, mut notices) =
        SessionCache::with_notices(factory, SessionCacheConfig::default());

    cache.get(1, CodeGenType::Html).await.unwrap();
    cache.get(1, CodeGenType::MultiFile).await.unwrap();
    cache.get(2, CodeGenType::Html).await.unwrap();

    cache.invalidate_app(1).await;
    cache.run_pending_tasks().await;
    assert_eq!(cache.entry_count(), 1);

    let mut removed = Vec::new();
    while let Ok(notice) = notices.try_recv() {
        assert_eq!(notice.cause, EvictionCause::Explicit);
        removed.push(notice.key);
    }
    removed.sort_by_key(|k| k.code_gen_type.value());
    assert_eq!(
        removed,
        vec![
            CacheKey::new(1, CodeGenType::Html),
            CacheKey::new(1, CodeGenType::MultiFile),
        ]
    );
}

#[tokio::test]
async fn test_evicted_session_stays_usable() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Arc::new(MockProvider::new());
    let factory = factory(
        mock_routes(),
        Arc::new(InMemoryHistoryLog::new()),
        provider.clone(),
        dir.path(),
    );
    let cache = SessionCache::new(factory, SessionCacheConfig::default());

    let held = cache.get(1, CodeGenType::Html).await.unwrap();
    cache.invalidate(&CacheKey::new(1, CodeGenType::Html)).await;

    provider.add_text_response(r#"{"htmlCode":"<html></html>","description":"still here"}"#);
    let result = held.generate_html("make a page").await.unwrap();
    assert_eq!(result.description, "still here");

    let fresh = cache.get(1, CodeGenType::Html).await.unwrap();
    assert!(!Arc::ptr_eq(&held, &fresh));
    assert!(fresh.memory_snapshot().await.is_empty());
}

#[tokio::test]
async fn test_new_session_replays_history_without_pending_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let log = Arc::new(InMemoryHistoryLog::new());
    for (text, kind) in [
        ("u1", MessageType::User),
        ("a1", MessageType::Ai),
        ("u2", MessageType::User),
        ("a2", MessageType::Ai),
        ("u3", MessageType::User),
    ] {
        log.append(8, text, kind, 1).await.unwrap();
    }
    let factory = factory(
        mock_routes(),
        log,
        Arc::new(MockProvider::new()),
        dir.path(),
    );
    let cache = SessionCache::new(factory, SessionCacheConfig::default());

    let session = cache.get(8, CodeGenType::Html).await.unwrap();
    let replayed = session.memory_snapshot().await;
    let texts: Vec<_> = replayed.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(texts, vec!["u1", "a1", "u2", "a2"]);
    assert_eq!(replayed[1].role, MessageRole::Assistant);
}

#[tokio::test]
async fn test_size_bound_evicts_with_size_notices() {
    let dir = tempfile::tempdir().unwrap();
    let factory = factory(
        mock_routes(),
        Arc::new(InMemoryHistoryLog::new()),
        Arc::new(MockProvider::new()),
        dir.path(),
    );
    let config = SessionCacheConfig {
        max_capacity: 2,
        ..SessionCacheConfig::default()
    };
    let (cache, mut notices) = SessionCache::with_notices(factory, config);

    for app_id in 1..=5 {
        cache.get(app_id, CodeGenType::Html).await.unwrap();
    }
    cache.run_pending_tasks().await;

    let remaining = cache.entry_count();
    assert!(remaining <= 2);

    let mut evicted = Vec::new();
    while let Ok(notice) = notices.try_recv() {
        assert_eq!(notice.cause, EvictionCause::Size);
        evicted.push(notice.key);
    }
    let reported = evicted.len();
    evicted.sort_by_key(|k| k.app_id);
    evicted.dedup();
    assert_eq!(evicted.len(), reported);
    assert_eq!(reported as u64, 5 - remaining);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_slow_build_does_not_block_other_keys() {
    let dir = tempfile::tempdir().unwrap();
    let history = Arc::new(GatedHistory::default());
    let factory = factory(
        mock_routes(),
        history.clone(),
        Arc::new(MockProvider::new()),
        dir.path(),
    );
    let cache = Arc::new(SessionCache::new(factory, SessionCacheConfig::default()));

    let stalled = {
        let cache = Arc::clone(&cache);
        tokio::spawn(async move { cache.get(1, CodeGenType::Html).await })
    };
    history.entered.notified().await;

    let other = tokio::time::timeout(Duration::from_secs(2), cache.get(2, CodeGenType::Html))
        .await
        .expect("build for app 2 waited on app 1")
        .unwrap();
    assert_eq!(other.app_id(), 2);
    assert!(!stalled.is_finished());

    history.release.notify_one();
    let first = stalled.await.unwrap().unwrap();
    assert_eq!(first.app_id(), 1);
}

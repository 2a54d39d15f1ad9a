//! Service handle cache behaviour: single-flight construction, TTL expiry,
//! and credential failures that are never cached.

mod support;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use ordersheet_core::testing::InMemorySpreadsheet;
use ordersheet_core::{HandleFactory, ServiceHandle};
use ordersheet_domain::{ErrorKind, Result};
use ordersheet_infra::sheets::{GoogleHandleFactory, HandleCacheConfig, ServiceHandleCache};
use support::{config, mount_token_endpoint, KeyFile};
use wiremock::MockServer;

struct SlowFactory {
    builds: Arc<AtomicUsize>,
}

#[async_trait]
impl HandleFactory for SlowFactory {
    async fn build(&self) -> Result<ServiceHandle> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok(Arc::new(InMemorySpreadsheet::new("s1")))
    }
}

fn slow_cache(ttl: Duration) -> (Arc<ServiceHandleCache<SlowFactory>>, Arc<AtomicUsize>) {
    let builds = Arc::new(AtomicUsize::new(0));
    let cache = ServiceHandleCache::new(
        SlowFactory { builds: builds.clone() },
        HandleCacheConfig::with_ttl(ttl),
    );
    (Arc::new(cache), builds)
}

#[tokio::test]
async fn concurrent_cold_callers_share_one_construction() {
    let (cache, builds) = slow_cache(Duration::from_secs(60));

    let handles = join_all((0..8).map(|_| {
        let cache = cache.clone();
        async move { cache.get().await.ok() }
    }))
    .await;

    assert_eq!(builds.load(Ordering::SeqCst), 1);
    let handles: Vec<ServiceHandle> = handles.into_iter().map(Option::unwrap).collect();
    assert!(handles.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
}

#[tokio::test]
async fn handle_is_rebuilt_after_ttl() {
    let (cache, builds) = slow_cache(Duration::from_millis(200));

    let first = cache.get().await.ok().unwrap();
    let again = cache.get().await.ok().unwrap();
    assert!(Arc::ptr_eq(&first, &again));

    tokio::time::sleep(Duration::from_millis(400)).await;

    let rebuilt = cache.get().await.ok().unwrap();
    assert!(!Arc::ptr_eq(&first, &rebuilt));
    assert_eq!(builds.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn missing_credentials_fail_and_are_retried() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    let dir = tempfile::TempDir::new().unwrap();
    let key_path = dir.path().join("service-account.json");
    let config = config(key_path.clone(), &server);
    let cache = ServiceHandleCache::new(
        GoogleHandleFactory::new(&config.google, &config.http),
        HandleCacheConfig::default(),
    );

    let err = cache.get().await.err().unwrap();
    assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);

    // The key appears; the next call constructs a handle instead of
    // returning the earlier failure.
    let key = KeyFile::for_server(&server);
    std::fs::copy(&key.path, &key_path).unwrap();

    assert!(cache.get().await.is_ok());
}

#[tokio::test]
async fn refused_grant_is_authentication_failure() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "Invalid JWT Signature."
        })))
        .expect(2)
        .mount(&server)
        .await;

    let key = KeyFile::for_server(&server);
    let config = config(key.path.clone(), &server);
    let cache = ServiceHandleCache::new(
        GoogleHandleFactory::new(&config.google, &config.http),
        HandleCacheConfig::default(),
    );

    for _ in 0..2 {
        let err = cache.get().await.err().unwrap();
        assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
    }
}

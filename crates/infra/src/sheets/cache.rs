//! Service handle caching with moka
//!
//! Holds at most one authenticated [`ServiceHandle`], rebuilt after a
//! time-to-live or on explicit invalidation.
//!
//! # Behaviour
//!
//! - **Single-flight**: concurrent callers during a miss share one in-flight
//!   construction (`try_get_with`)
//! - **Error Handling**: failed constructions are returned to every waiter
//!   and never cached; the next call retries
//! - **TTL**: measured from construction, default one hour

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use ordersheet_core::{HandleFactory, HandleProvider, ServiceHandle};
use ordersheet_domain::constants::DEFAULT_HANDLE_TTL;
use ordersheet_domain::{CacheConfig, Result, SheetError};
use tracing::{debug, info};

/// Handle cache configuration
#[derive(Debug, Clone)]
pub struct HandleCacheConfig {
    /// Lifetime of a constructed handle
    pub ttl: Duration,
}

impl Default for HandleCacheConfig {
    fn default() -> Self {
        Self { ttl: DEFAULT_HANDLE_TTL }
    }
}

impl From<&CacheConfig> for HandleCacheConfig {
    fn from(config: &CacheConfig) -> Self {
        Self { ttl: Duration::from_secs(config.handle_ttl_seconds) }
    }
}

impl HandleCacheConfig {
    /// Create config with custom TTL (useful for testing)
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// Log configuration at startup
    pub fn log_config(&self) {
        info!(ttl_seconds = self.ttl.as_secs(), "service handle cache configuration loaded");
    }
}

/// Process-wide cache of the authenticated spreadsheet handle.
pub struct ServiceHandleCache<F: HandleFactory> {
    cache: Cache<(), ServiceHandle>,
    factory: Arc<F>,
}

impl<F: HandleFactory + 'static> ServiceHandleCache<F> {
    /// Create an empty cache that builds handles with `factory`.
    pub fn new(factory: F, config: HandleCacheConfig) -> Self {
        config.log_config();
        let cache = Cache::builder().max_capacity(1).time_to_live(config.ttl).build();
        Self { cache, factory: Arc::new(factory) }
    }

    /// Get the cached handle, constructing it on miss or expiry.
    ///
    /// # Errors
    /// Whatever the factory returns (normally `AuthenticationFailed`).
    pub async fn get(&self) -> Result<ServiceHandle> {
        let factory = Arc::clone(&self.factory);
        self.cache
            .try_get_with((), async move {
                debug!("constructing service handle");
                factory.build().await
            })
            .await
            .map_err(|shared: Arc<SheetError>| {
                Arc::try_unwrap(shared).unwrap_or_else(|shared| (*shared).clone())
            })
    }

    /// Drop the cached handle; the next `get` rebuilds it.
    pub async fn invalidate(&self) {
        debug!("invalidating service handle");
        self.cache.invalidate(&()).await;
    }
}

#[async_trait]
impl<F: HandleFactory + 'static> HandleProvider for ServiceHandleCache<F> {
    async fn handle(&self) -> Result<ServiceHandle> {
        self.get().await
    }

    async fn invalidate(&self) {
        ServiceHandleCache::invalidate(self).await;
    }
}

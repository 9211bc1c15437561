//! Cached access to a provider's key set

use crate::error::{Error, Result};
use crate::jwks::{HttpKeySetSource, KeySet, KeySetSource};
use crate::pool::UserPool;
use crate::url::validate_jwks_url;
use moka::future::Cache;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// Default lifetime of a cached key set
pub const DEFAULT_JWKS_TTL: Duration = Duration::from_secs(3600);

/// Holds the current key set of one JWKS endpoint
///
/// The set is fetched lazily on first use and again once the TTL has
/// passed. Concurrent misses share a single fetch. A refresh replaces the
/// whole `Arc<KeySet>`, so readers holding the previous set keep a
/// consistent view.
pub struct KeySetCache {
    url: String,
    source: Arc<dyn KeySetSource>,
    cache: Cache<String, Arc<KeySet>>,
    generation: AtomicU64,
    refresh_lock: tokio::sync::Mutex<()>,
    ttl: Duration,
}

impl KeySetCache {
    /// Cache the key set published at `url`, fetched through `source`
    pub fn new(url: impl Into<String>, source: Arc<dyn KeySetSource>) -> Result<Self> {
        let url = url.into();
        validate_jwks_url(&url)?;

        Ok(Self {
            url,
            source,
            cache: Self::build_cache(DEFAULT_JWKS_TTL),
            generation: AtomicU64::new(0),
            refresh_lock: tokio::sync::Mutex::new(()),
            ttl: DEFAULT_JWKS_TTL,
        })
    }

    /// Cache for a Cognito user pool, fetched over HTTP
    pub fn for_user_pool(pool: &UserPool, timeout: Duration) -> Result<Self> {
        let source = HttpKeySetSource::new(timeout)?;
        Self::new(pool.jwks_url(), Arc::new(source))
    }

    /// Replace the cache lifetime; drops any cached set
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.cache = Self::build_cache(ttl);
        self.ttl = ttl;
        self
    }

    fn build_cache(ttl: Duration) -> Cache<String, Arc<KeySet>> {
        Cache::builder().max_capacity(1).time_to_live(ttl).build()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current key set, fetching it when absent or expired
    pub async fn get(&self) -> Result<Arc<KeySet>> {
        if let Some(set) = self.cache.get(&self.url).await {
            debug!(url = %self.url, generation = set.generation(), "key set cache hit");
            return Ok(set);
        }

        debug!(url = %self.url, "key set cache miss");
        self.cache
            .try_get_with(self.url.clone(), async { self.fetch().await.map(Arc::new) })
            .await
            .map_err(|e: Arc<Error>| (*e).clone())
    }

    /// Fetch a new key set unless one newer than `stale_generation` is cached
    ///
    /// Callers pass the generation of the set they found lacking. When
    /// several callers refresh the same generation at once, only the first
    /// fetches and the rest receive its result.
    pub async fn refresh(&self, stale_generation: u64) -> Result<Arc<KeySet>> {
        let _guard = self.refresh_lock.lock().await;

        if let Some(current) = self.cache.get(&self.url).await {
            if current.generation() > stale_generation {
                debug!(
                    url = %self.url,
                    generation = current.generation(),
                    stale_generation,
                    "key set already refreshed"
                );
                return Ok(current);
            }
        }

        let fresh = Arc::new(self.fetch().await?);
        self.cache.insert(self.url.clone(), Arc::clone(&fresh)).await;
        Ok(fresh)
    }

    /// Drop the cached key set; the next [`get`](Self::get) fetches
    pub async fn invalidate(&self) {
        self.cache.invalidate(&self.url).await;
    }

    /// Cached key set, without fetching
    pub async fn cached(&self) -> Option<Arc<KeySet>> {
        self.cache.get(&self.url).await
    }

    async fn fetch(&self) -> Result<KeySet> {
        let body = self.source.fetch(&self.url).await?;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let set = KeySet::from_json(&body, &self.url, generation)?;

        debug!(
            url = %self.url,
            generation,
            keys = set.len(),
            "fetched key set"
        );

        Ok(set)
    }
}

impl std::fmt::Debug for KeySetCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeySetCache")
            .field("url", &self.url)
            .field("ttl", &self.ttl)
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

//! TTL response cache behind an injected abstraction.
//!
//! The orchestrator talks to [`ResponseCache`], never to a concrete store,
//! so the same aggregation logic works with the in-process [`moka`] cache,
//! an external store, or a test double. Keys are derived deterministically
//! from `(normalised query, user type, region)`. Entries expire lazily
//! after their per-entry TTL; overwrites are last-write-wins.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;

use crate::types::{SearchResponse, UserType};

/// Maximum number of cached responses held in memory.
const MAX_CACHE_ENTRIES: u64 = 256;

/// Composite cache key: normalised query + user type + region.
///
/// The same `(query, user_type, region)` triple always produces the same
/// key: the query is trimmed and lower-cased, the region lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    query: String,
    user_type: UserType,
    region: String,
}

impl CacheKey {
    /// Build a deterministic cache key from the request triple.
    pub fn new(query: &str, user_type: UserType, region: &str) -> Self {
        Self {
            query: query.trim().to_lowercase(),
            user_type,
            region: region.trim().to_lowercase(),
        }
    }

    /// Stable hex digest of this key, usable as a string key for an
    /// external store and in diagnostics.
    pub fn digest(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.query.as_bytes());
        hasher.update(b"\0");
        hasher.update(self.user_type.name().as_bytes());
        hasher.update(b"\0");
        hasher.update(self.region.as_bytes());
        hasher.finalize().to_hex().to_string()
    }
}

/// A TTL-keyed store of previously computed responses.
///
/// Implementations must be safe under concurrent `get`s; concurrent `set`s
/// to the same key are last-write-wins. A faulty backing store must degrade
/// to always-miss rather than failing the request, which is why the trait
/// is infallible: impls log their own faults and return `None`.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    /// Look up a cached response. Returns `None` on miss or expiry.
    async fn get(&self, key: &CacheKey) -> Option<SearchResponse>;

    /// Store a response under `key` for `ttl`.
    async fn set(&self, key: CacheKey, value: SearchResponse, ttl: Duration);
}

#[derive(Clone)]
struct CachedResponse {
    response: SearchResponse,
    ttl: Duration,
}

/// Expire each entry `ttl` after creation. Updates reset the clock, which
/// gives overwritten keys a fresh lifetime.
struct PerEntryTtl;

impl Expiry<CacheKey, CachedResponse> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &CacheKey,
        value: &CachedResponse,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &CacheKey,
        value: &CachedResponse,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process [`ResponseCache`] backed by [`moka`].
pub struct MokaResponseCache {
    inner: Cache<CacheKey, CachedResponse>,
}

impl MokaResponseCache {
    /// Create a cache bounded to [`MAX_CACHE_ENTRIES`] responses.
    pub fn new() -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(MAX_CACHE_ENTRIES)
                .expire_after(PerEntryTtl)
                .build(),
        }
    }
}

impl Default for MokaResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponseCache for MokaResponseCache {
    async fn get(&self, key: &CacheKey) -> Option<SearchResponse> {
        self.inner.get(key).await.map(|entry| entry.response)
    }

    async fn set(&self, key: CacheKey, value: SearchResponse, ttl: Duration) {
        self.inner
            .insert(
                key,
                CachedResponse {
                    response: value,
                    ttl,
                },
            )
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_response(query: &str) -> SearchResponse {
        SearchResponse {
            results: vec![],
            total: 0,
            query: query.to_owned(),
            active_sources: vec![],
            execution_time_ms: 1,
            suggestions: vec![],
        }
    }

    #[test]
    fn key_deterministic_for_same_triple() {
        let a = CacheKey::new("nike shoes", UserType::Shopper, "us");
        let b = CacheKey::new("nike shoes", UserType::Shopper, "us");
        assert_eq!(a, b);
        assert_eq!(a.digest(), b.digest());
    }

    #[test]
    fn key_normalises_query_case_and_whitespace() {
        let a = CacheKey::new("  Nike Shoes ", UserType::Shopper, "US");
        let b = CacheKey::new("nike shoes", UserType::Shopper, "us");
        assert_eq!(a, b);
    }

    #[test]
    fn key_differs_by_user_type() {
        let a = CacheKey::new("nike shoes", UserType::Shopper, "us");
        let b = CacheKey::new("nike shoes", UserType::Vendor, "us");
        assert_ne!(a, b);
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn key_differs_by_region() {
        let a = CacheKey::new("nike shoes", UserType::Shopper, "us");
        let b = CacheKey::new("nike shoes", UserType::Shopper, "eu");
        assert_ne!(a, b);
    }

    #[test]
    fn key_differs_by_query() {
        let a = CacheKey::new("nike shoes", UserType::Shopper, "us");
        let b = CacheKey::new("adidas shoes", UserType::Shopper, "us");
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn miss_returns_none() {
        let cache = MokaResponseCache::new();
        let key = CacheKey::new("never stored", UserType::Shopper, "us");
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn insert_and_retrieve() {
        let cache = MokaResponseCache::new();
        let key = CacheKey::new("nike shoes", UserType::Shopper, "us");

        cache
            .set(key.clone(), make_response("nike shoes"), Duration::from_secs(60))
            .await;

        let cached = cache.get(&key).await.expect("should be cached");
        assert_eq!(cached.query, "nike shoes");
    }

    #[tokio::test]
    async fn overwrite_same_key_is_last_write_wins() {
        let cache = MokaResponseCache::new();
        let key = CacheKey::new("nike shoes", UserType::Shopper, "us");

        cache
            .set(key.clone(), make_response("old"), Duration::from_secs(60))
            .await;
        cache
            .set(key.clone(), make_response("new"), Duration::from_secs(60))
            .await;

        let cached = cache.get(&key).await.expect("should be cached");
        assert_eq!(cached.query, "new");
    }

    #[tokio::test]
    async fn entry_expires_after_ttl() {
        let cache = MokaResponseCache::new();
        let key = CacheKey::new("short lived", UserType::Shopper, "us");

        cache
            .set(key.clone(), make_response("short lived"), Duration::from_secs(1))
            .await;
        assert!(cache.get(&key).await.is_some());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn keys_cached_independently() {
        let cache = MokaResponseCache::new();
        let key_us = CacheKey::new("nike shoes", UserType::Shopper, "us");
        let key_eu = CacheKey::new("nike shoes", UserType::Shopper, "eu");

        cache
            .set(key_us.clone(), make_response("us page"), Duration::from_secs(60))
            .await;

        assert!(cache.get(&key_us).await.is_some());
        assert!(cache.get(&key_eu).await.is_none());
    }
}

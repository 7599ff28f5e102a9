//! cambio-cache
//!
//! Process-lifetime key/value store with a time-to-live per entry.
//!
//! Expiry is checked lazily on read: an entry is never returned once its TTL
//! has elapsed. A capacity bound evicts the least useful entries when the
//! store grows past `CacheConfig::max_entries`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use cambio_core::{CacheConfig, CacheKey};
use moka::Expiry;
use moka::future::Cache;
use serde_json::Value;

/// Storage seam used by the resolver and the relay.
///
/// Writes for a key overwrite earlier ones; there is no other update or
/// delete operation.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Value stored under `key`, unless absent or expired.
    async fn get(&self, key: &CacheKey) -> Option<Value>;
    /// Store `value` under `key` for `ttl`. A zero `ttl` stores nothing.
    async fn set(&self, key: CacheKey, value: Value, ttl: Duration);
}

#[derive(Clone)]
struct Entry {
    value: Arc<Value>,
    ttl: Duration,
    expires_at: Instant,
}

struct PerEntryTtl;

impl Expiry<CacheKey, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &CacheKey,
        value: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &CacheKey,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Concurrent TTL cache backed by `moka`.
///
/// Cheap to share: construct once per process and hand out `Arc<TtlCache>`.
pub struct TtlCache {
    inner: Cache<CacheKey, Entry>,
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

impl TtlCache {
    /// Build an empty cache bounded by `cfg.max_entries`.
    #[must_use]
    pub fn new(cfg: &CacheConfig) -> Self {
        let inner = Cache::builder()
            .max_capacity(cfg.max_entries.max(1))
            .expire_after(PerEntryTtl)
            .build();
        Self { inner }
    }

    /// Number of live entries after pending maintenance has run.
    pub async fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }
}

#[async_trait]
impl CacheStore for TtlCache {
    async fn get(&self, key: &CacheKey) -> Option<Value> {
        let entry = self.inner.get(key).await?;
        if Instant::now() <= entry.expires_at {
            return Some(Value::clone(&entry.value));
        }
        // expired but not yet swept; the expiry policy evicts it
        None
    }

    async fn set(&self, key: CacheKey, value: Value, ttl: Duration) {
        if ttl.is_zero() {
            return;
        }
        let entry = Entry {
            value: Arc::new(value),
            ttl,
            expires_at: Instant::now() + ttl,
        };
        self.inner.insert(key, entry).await;
    }
}

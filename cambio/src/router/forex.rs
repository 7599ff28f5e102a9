use std::sync::Arc;

use cambio_cache::{CacheStore, TtlCache};
use cambio_core::{
    CacheKey, CambioError, Capability, ForexConfig, ForexResult, ForexUpstream, QueryParams,
};

use crate::core::provider_call_with_timeout;

/// Cache-first pass-through to a single forex upstream. No fallback.
pub struct ForexRelay {
    upstream: Arc<dyn ForexUpstream>,
    cache: Arc<dyn CacheStore>,
    cfg: ForexConfig,
}

/// Builder for [`ForexRelay`].
pub struct ForexRelayBuilder {
    upstream: Option<Arc<dyn ForexUpstream>>,
    cache: Option<Arc<dyn CacheStore>>,
    cfg: ForexConfig,
}

impl ForexRelayBuilder {
    /// Register the upstream. Required.
    #[must_use]
    pub fn with_upstream(mut self, upstream: Arc<dyn ForexUpstream>) -> Self {
        self.upstream = Some(upstream);
        self
    }

    /// Share a cache with other components.
    #[must_use]
    pub fn cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Replace the configuration. `base_url` is only read by HTTP upstreams.
    #[must_use]
    pub fn config(mut self, cfg: ForexConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Build the relay.
    ///
    /// # Errors
    /// Returns `InvalidArg` when no upstream was registered or the timeout is zero.
    pub fn build(self) -> Result<ForexRelay, CambioError> {
        let upstream = self
            .upstream
            .ok_or_else(|| CambioError::InvalidArg("no forex upstream registered".into()))?;
        if self.cfg.timeout.is_zero() {
            return Err(CambioError::InvalidArg("timeouts must be non-zero".into()));
        }
        Ok(ForexRelay {
            upstream,
            cache: self
                .cache
                .unwrap_or_else(|| Arc::new(TtlCache::default()) as Arc<dyn CacheStore>),
            cfg: self.cfg,
        })
    }
}

impl ForexRelay {
    /// Start building a relay with a 60s cache TTL.
    #[must_use]
    pub fn builder() -> ForexRelayBuilder {
        ForexRelayBuilder {
            upstream: None,
            cache: None,
            cfg: ForexConfig::default(),
        }
    }

    /// Relay `path` and `query` to the upstream, serving repeats from cache.
    ///
    /// Leading slashes are dropped from `path`; everything else is forwarded
    /// verbatim. Only successful bodies are cached.
    ///
    /// # Errors
    /// Upstream errors are returned unchanged so callers can mirror the
    /// upstream status; a stalled upstream yields `ProviderTimeout`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "cambio::relay", skip(self, query), fields(params = query.len()))
    )]
    pub async fn relay(&self, path: &str, query: &QueryParams) -> Result<ForexResult, CambioError> {
        let path = path.trim_start_matches('/');
        let key = CacheKey::forex(path, query);

        if let Some(data) = self.cache.get(&key).await {
            #[cfg(feature = "tracing")]
            tracing::debug!(path, "cache hit");
            return Ok(ForexResult {
                data,
                from_cache: true,
            });
        }

        let data = provider_call_with_timeout(
            self.upstream.name(),
            Capability::Forex,
            self.cfg.timeout,
            self.upstream.fetch(path, query),
        )
        .await?;
        self.cache.set(key, data.clone(), self.cfg.cache_ttl).await;
        Ok(ForexResult {
            data,
            from_cache: false,
        })
    }
}

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use cambio_cache::{CacheStore, TtlCache};
use cambio_core::{CambioError, Capability, ExchangeGateway, ExchangeId, ResolverConfig};

/// Resolves crypto market-data requests: cache first, then the hinted
/// exchange, then the remaining priority list in order.
pub struct QuoteResolver {
    pub(crate) gateway: Arc<dyn ExchangeGateway>,
    pub(crate) cache: Arc<dyn CacheStore>,
    pub(crate) cfg: ResolverConfig,
    default: ExchangeId,
}

/// Builder for constructing a [`QuoteResolver`].
pub struct QuoteResolverBuilder {
    gateway: Option<Arc<dyn ExchangeGateway>>,
    cache: Option<Arc<dyn CacheStore>>,
    cfg: ResolverConfig,
}

impl Default for QuoteResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteResolverBuilder {
    /// Create a builder with the fallback configuration.
    ///
    /// Defaults: priority `huobi, kraken, kucoin, okx`; `binance` hints are
    /// served by the default exchange; 30s cache TTL; 15s per attempt; 60s per
    /// request. A private cache is created unless one is supplied.
    #[must_use]
    pub fn new() -> Self {
        Self {
            gateway: None,
            cache: None,
            cfg: ResolverConfig::default(),
        }
    }

    /// Register the exchange gateway. Required.
    #[must_use]
    pub fn with_gateway(mut self, gateway: Arc<dyn ExchangeGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Share a cache with other components.
    #[must_use]
    pub fn cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Replace the whole configuration, e.g. with [`ResolverConfig::direct`].
    #[must_use]
    pub fn config(mut self, cfg: ResolverConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Ordered exchanges; the first one serves requests without a hint.
    #[must_use]
    pub fn priority(mut self, exchanges: Vec<ExchangeId>) -> Self {
        self.cfg.priority = exchanges;
        self
    }

    /// Toggle fallback to the rest of the priority list after a failure.
    #[must_use]
    pub const fn fallback(mut self, enabled: bool) -> Self {
        self.cfg.fallback_enabled = enabled;
        self
    }

    /// Hints that are served by the default exchange instead.
    #[must_use]
    pub fn hints_mapped_to_default(mut self, hints: BTreeSet<ExchangeId>) -> Self {
        self.cfg.hints_mapped_to_default = hints;
        self
    }

    /// TTL for successful results. Zero disables caching.
    #[must_use]
    pub const fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cfg.cache_ttl = ttl;
        self
    }

    /// Upper bound for a single exchange attempt.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.provider_timeout = timeout;
        self
    }

    /// Upper bound for a whole resolution, across all attempts.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.cfg.request_timeout = timeout;
        self
    }

    /// Build the resolver.
    ///
    /// # Errors
    /// Returns `InvalidArg` when no gateway was registered, the priority list
    /// is empty or lists an exchange twice, or a timeout is zero.
    pub fn build(self) -> Result<QuoteResolver, CambioError> {
        let gateway = self
            .gateway
            .ok_or_else(|| CambioError::InvalidArg("no exchange gateway registered".into()))?;

        let default = self.cfg.default_exchange().cloned().ok_or_else(|| {
            CambioError::InvalidArg("priority list must name at least one exchange".into())
        })?;
        let mut seen = BTreeSet::new();
        if let Some(dup) = self.cfg.priority.iter().find(|id| !seen.insert(*id)) {
            return Err(CambioError::InvalidArg(format!(
                "exchange {dup} appears twice in the priority list"
            )));
        }
        if self.cfg.provider_timeout.is_zero()
            || self.cfg.request_timeout.is_some_and(|t| t.is_zero())
        {
            return Err(CambioError::InvalidArg("timeouts must be non-zero".into()));
        }

        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(TtlCache::default()) as Arc<dyn CacheStore>);
        Ok(QuoteResolver {
            gateway,
            cache,
            cfg: self.cfg,
            default,
        })
    }
}

impl QuoteResolver {
    /// Start building a resolver.
    #[must_use]
    pub fn builder() -> QuoteResolverBuilder {
        QuoteResolverBuilder::new()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &ResolverConfig {
        &self.cfg
    }

    /// Exchange that serves `hint`.
    ///
    /// Absent hints and hints listed in `hints_mapped_to_default` go to the
    /// first priority entry; anything else is kept as-is.
    #[must_use]
    pub fn normalize_hint(&self, hint: Option<&ExchangeId>) -> ExchangeId {
        match hint {
            Some(h) if !self.cfg.hints_mapped_to_default.contains(h) => h.clone(),
            _ => self.default.clone(),
        }
    }
}

/// Await `fut` for at most `timeout`, mapping expiry to `ProviderTimeout`.
pub(crate) async fn provider_call_with_timeout<T, Fut>(
    connector: &str,
    capability: Capability,
    timeout: Duration,
    fut: Fut,
) -> Result<T, CambioError>
where
    Fut: core::future::Future<Output = Result<T, CambioError>>,
{
    (tokio::time::timeout(timeout, fut).await)
        .unwrap_or_else(|_| Err(CambioError::provider_timeout(connector, capability.as_str())))
}

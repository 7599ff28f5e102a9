use std::sync::Arc;
use std::time::Duration;

use cambio::{CacheStore, ForexRelay, QuoteResolver, TtlCache};
use cambio_rest::{HttpForexUpstream, RestGateway};

use crate::config::ServerConfig;
use crate::error::StartupError;

/// Shared handles used by every request.
///
/// Crypto and forex entries live in one cache; their key prefixes keep them apart.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<QuoteResolver>,
    pub forex: Arc<ForexRelay>,
    pub cache: Arc<TtlCache>,
}

impl AppState {
    #[must_use]
    pub fn new(resolver: QuoteResolver, forex: ForexRelay, cache: Arc<TtlCache>) -> Self {
        Self {
            resolver: Arc::new(resolver),
            forex: Arc::new(forex),
            cache,
        }
    }

    /// Wire the REST gateway, forex upstream and cache from configuration.
    ///
    /// # Errors
    /// Returns an error for invalid resolver settings, base URLs or an HTTP
    /// client that cannot be built.
    pub fn from_config(cfg: &ServerConfig) -> Result<Self, StartupError> {
        let cache = Arc::new(TtlCache::new(&cfg.cache_config()));

        let mut gateway =
            RestGateway::builder().timeout(Duration::from_secs(cfg.server.http_timeout_secs));
        for (exchange, url) in &cfg.exchanges {
            gateway = gateway.base_url(exchange, url.clone());
        }

        let resolver = QuoteResolver::builder()
            .with_gateway(Arc::new(gateway.build()?))
            .cache(Arc::clone(&cache) as Arc<dyn CacheStore>)
            .config(cfg.resolver_config()?)
            .build()?;

        let forex_cfg = cfg.forex_config();
        let forex = ForexRelay::builder()
            .with_upstream(Arc::new(HttpForexUpstream::new(&forex_cfg)?))
            .cache(Arc::clone(&cache) as Arc<dyn CacheStore>)
            .config(forex_cfg)
            .build()?;

        Ok(Self::new(resolver, forex, cache))
    }
}

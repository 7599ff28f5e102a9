use core::fmt;

use serde_json::{Value, json};

use crate::{ExchangeId, QueryParams};

/// Cache key derived purely from request inputs.
///
/// Components are encoded as a JSON array behind a domain prefix, so every
/// component is escaped and an absent optional (`null`) never collides with
/// any string a caller can send.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for a crypto request: `(exchange, symbol, timeframe, limit)`.
    #[must_use]
    pub fn crypto(
        exchange: &ExchangeId,
        symbol: &str,
        timeframe: Option<&str>,
        limit: Option<u32>,
    ) -> Self {
        let parts = json!([exchange.as_str(), symbol, timeframe, limit]);
        Self::with_domain("crypto", &parts)
    }

    /// Key for a forex relay: `(path, query)`.
    ///
    /// `QueryParams` is ordered by key, so parameter order in the incoming
    /// URL does not affect the key.
    #[must_use]
    pub fn forex(path: &str, query: &QueryParams) -> Self {
        let parts = json!([path, query]);
        Self::with_domain("forex", &parts)
    }

    fn with_domain(domain: &str, parts: &Value) -> Self {
        Self(format!("{domain}:{parts}"))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CacheKey> for String {
    fn from(k: CacheKey) -> Self {
        k.0
    }
}

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::{CambioError, Candle, ExchangeId, Ticker};

/// Query parameters forwarded to an upstream, ordered by key.
pub type QueryParams = BTreeMap<String, String>;

/// Market-data access across a set of crypto exchanges.
///
/// Implementations fetch from the exchange named by each call. They do not
/// throttle or time out calls themselves; the resolver bounds every call and
/// per-exchange pacing belongs to the underlying client.
#[async_trait]
pub trait ExchangeGateway: Send + Sync {
    /// Stable gateway name for logs.
    fn name(&self) -> &'static str;

    /// Every exchange this gateway can reach, in no particular order.
    fn supported(&self) -> Vec<ExchangeId>;

    /// Returns true if `exchange` can be fetched through this gateway.
    fn supports(&self, exchange: &ExchangeId) -> bool {
        self.supported().contains(exchange)
    }

    /// Fetch a ticker snapshot for `symbol` on `exchange`.
    async fn fetch_ticker(&self, exchange: &ExchangeId, symbol: &str)
    -> Result<Ticker, CambioError>;

    /// Fetch OHLCV candles for `symbol` on `exchange`, oldest first.
    ///
    /// When `limit` is set at most that many of the most recent candles are returned.
    async fn fetch_ohlcv(
        &self,
        exchange: &ExchangeId,
        symbol: &str,
        timeframe: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Candle>, CambioError>;
}

/// Single upstream host that forex requests are relayed to.
#[async_trait]
pub trait ForexUpstream: Send + Sync {
    /// Stable upstream name for logs and error origins.
    fn name(&self) -> &'static str;

    /// GET `path` with `query` and return the decoded response body.
    ///
    /// Non-success responses fail with `CambioError::Upstream` carrying the
    /// upstream status and body.
    async fn fetch(&self, path: &str, query: &QueryParams)
    -> Result<serde_json::Value, CambioError>;
}

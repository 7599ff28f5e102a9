//! Request and response types for the resolver and the forex relay.

use serde::{Deserialize, Serialize};

use crate::{CambioError, ExchangeId};

/// Logical crypto market-data request.
///
/// `timeframe` selects OHLCV candles; without it a ticker snapshot is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Preferred exchange; the resolver substitutes its default when absent.
    pub exchange_hint: Option<ExchangeId>,
    /// Unified pair symbol such as `BTC/USDT`. Required.
    pub symbol: String,
    /// Candle timeframe such as `1h`.
    pub timeframe: Option<String>,
    /// Maximum number of candles to return.
    pub limit: Option<u32>,
}

impl QuoteRequest {
    /// Ticker request for `symbol` on the default exchange.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    /// Set the exchange hint.
    #[must_use]
    pub fn exchange(mut self, exchange: ExchangeId) -> Self {
        self.exchange_hint = Some(exchange);
        self
    }

    /// Request candles of the given timeframe instead of a ticker.
    #[must_use]
    pub fn timeframe(mut self, timeframe: impl Into<String>) -> Self {
        self.timeframe = Some(timeframe.into());
        self
    }

    /// Bound the number of candles returned.
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Build a request from raw query-string values.
    ///
    /// Empty strings count as absent. A missing `symbol` is left empty so the
    /// resolver reports it; everything else is validated here.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `exchange` is malformed or `limit` is not a
    /// positive integer.
    pub fn from_params(
        exchange: Option<&str>,
        symbol: Option<&str>,
        timeframe: Option<&str>,
        limit: Option<&str>,
    ) -> Result<Self, CambioError> {
        fn present(v: Option<&str>) -> Option<&str> {
            v.map(str::trim).filter(|s| !s.is_empty())
        }

        let exchange_hint = present(exchange).map(ExchangeId::new).transpose()?;
        let limit = match present(limit) {
            None => None,
            Some(raw) => match raw.parse::<u32>() {
                Ok(n) if n > 0 => Some(n),
                _ => {
                    return Err(CambioError::InvalidArg(format!(
                        "limit must be a positive integer, got {raw:?}"
                    )));
                }
            },
        };

        Ok(Self {
            exchange_hint,
            symbol: present(symbol).unwrap_or_default().to_string(),
            timeframe: present(timeframe).map(str::to_string),
            limit,
        })
    }
}

/// Successful crypto resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    /// Ticker object or OHLCV rows as JSON.
    pub data: serde_json::Value,
    /// Exchange that actually produced `data`.
    pub used_exchange: ExchangeId,
    /// Exchange originally selected for the request (hint or default).
    pub original_exchange: ExchangeId,
    /// True when served from the cache without an upstream call.
    pub from_cache: bool,
}

/// Successful forex relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForexResult {
    /// Upstream response body.
    pub data: serde_json::Value,
    /// True when served from the cache without an upstream call.
    pub from_cache: bool,
}

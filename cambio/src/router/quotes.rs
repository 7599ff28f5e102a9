use std::time::Duration;

use cambio_core::{
    AttemptLedger, CacheKey, CambioError, Capability, ExchangeId, MarketData, QuoteRequest,
    QuoteResult,
};
use serde_json::Value;
use tokio::time::Instant;

use crate::QuoteResolver;
use crate::core::provider_call_with_timeout;

impl QuoteResolver {
    /// Resolve one request to market data.
    ///
    /// Order of work:
    /// - reject a missing symbol before touching the cache;
    /// - serve a cached result for the normalized exchange if one is live;
    /// - otherwise try the normalized exchange, then (with fallback enabled)
    ///   the remaining priority entries, each exchange at most once;
    /// - cache the first non-empty result under the normalized exchange's key.
    ///
    /// An empty OHLCV series counts as a failure. Each attempt is bounded by
    /// the provider timeout and by whatever remains of the request timeout.
    ///
    /// # Errors
    /// - `InvalidArg` when `symbol` is missing.
    /// - `UnsupportedExchange` when the normalized exchange is not reachable.
    /// - `AllExchangesFailed` with one ledger entry per exchange attempted.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "cambio::resolve",
            skip(self, req),
            fields(
                symbol = %req.symbol,
                hint = ?req.exchange_hint,
                timeframe = ?req.timeframe,
                limit = ?req.limit,
            ),
        )
    )]
    pub async fn resolve(&self, req: &QuoteRequest) -> Result<QuoteResult, CambioError> {
        let symbol = req.symbol.trim();
        if symbol.is_empty() {
            return Err(CambioError::InvalidArg(
                "missing required parameter: symbol".into(),
            ));
        }

        let original = self.normalize_hint(req.exchange_hint.as_ref());
        let key = CacheKey::crypto(&original, symbol, req.timeframe.as_deref(), req.limit);

        if let Some(data) = self.cache.get(&key).await {
            #[cfg(feature = "tracing")]
            tracing::debug!(exchange = %original, "cache hit");
            return Ok(QuoteResult {
                data,
                used_exchange: original.clone(),
                original_exchange: original,
                from_cache: true,
            });
        }

        if !self.gateway.supports(&original) {
            return Err(CambioError::UnsupportedExchange {
                exchange: original.to_string(),
                supported: self.cfg.priority.clone(),
            });
        }

        let deadline = self.cfg.request_timeout.map(|t| Instant::now() + t);
        let mut ledger = AttemptLedger::new();

        for exchange in self.candidates(&original) {
            if ledger.contains(&exchange) {
                continue;
            }
            let Some(budget) = self.attempt_budget(deadline) else {
                #[cfg(feature = "tracing")]
                tracing::warn!(attempted = ledger.len(), "request deadline reached");
                break;
            };
            if !self.gateway.supports(&exchange) {
                ledger.record(exchange, "exchange not supported");
                continue;
            }

            match self.fetch(&exchange, symbol, req, budget).await {
                Ok(data) => {
                    #[cfg(feature = "tracing")]
                    if exchange != original {
                        tracing::info!(used = %exchange, original = %original, "served by fallback exchange");
                    }
                    self.cache.set(key, data.clone(), self.cfg.cache_ttl).await;
                    return Ok(QuoteResult {
                        data,
                        used_exchange: exchange,
                        original_exchange: original,
                        from_cache: false,
                    });
                }
                Err(e) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(exchange = %exchange, error = %e, "exchange attempt failed");
                    ledger.record(exchange, e.ledger_message());
                }
            }
        }

        Err(CambioError::AllExchangesFailed { ledger })
    }

    /// The normalized exchange first, then the rest of the priority list
    /// when fallback is enabled and the exchange is itself on that list.
    fn candidates(&self, original: &ExchangeId) -> Vec<ExchangeId> {
        let mut out = vec![original.clone()];
        if self.cfg.fallback_enabled && self.cfg.priority.contains(original) {
            out.extend(self.cfg.priority.iter().filter(|e| *e != original).cloned());
        }
        out
    }

    /// Time allowed for the next attempt, or `None` once the deadline passed.
    fn attempt_budget(&self, deadline: Option<Instant>) -> Option<Duration> {
        let Some(deadline) = deadline else {
            return Some(self.cfg.provider_timeout);
        };
        let left = deadline.saturating_duration_since(Instant::now());
        if left.is_zero() {
            None
        } else {
            Some(left.min(self.cfg.provider_timeout))
        }
    }

    async fn fetch(
        &self,
        exchange: &ExchangeId,
        symbol: &str,
        req: &QuoteRequest,
        budget: Duration,
    ) -> Result<Value, CambioError> {
        let gw = &self.gateway;
        let data = match req.timeframe.as_deref() {
            Some(tf) => MarketData::Ohlcv(
                provider_call_with_timeout(
                    exchange.as_str(),
                    Capability::Ohlcv,
                    budget,
                    gw.fetch_ohlcv(exchange, symbol, tf, req.limit),
                )
                .await?,
            ),
            None => MarketData::Ticker(
                provider_call_with_timeout(
                    exchange.as_str(),
                    Capability::Ticker,
                    budget,
                    gw.fetch_ticker(exchange, symbol),
                )
                .await?,
            ),
        };
        if data.is_empty() {
            return Err(CambioError::Data("empty result".into()));
        }
        Ok(serde_json::to_value(&data)?)
    }
}

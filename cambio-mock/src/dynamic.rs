use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use cambio_core::{Candle, CambioError, Capability, ExchangeGateway, ExchangeId, Ticker};

use crate::MockBehavior;

/// One logged gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayCall {
    /// Exchange the call was addressed to.
    pub exchange: ExchangeId,
    /// Ticker or OHLCV.
    pub capability: Capability,
    /// Symbol as passed by the caller.
    pub symbol: String,
}

#[derive(Default)]
struct InternalState {
    ticker_rules: HashMap<ExchangeId, MockBehavior<Ticker>>,
    ohlcv_rules: HashMap<ExchangeId, MockBehavior<Vec<Candle>>>,
    calls: Vec<GatewayCall>,
}

/// Controller handle used by tests to drive the dynamic gateway.
pub struct GatewayController {
    state: Arc<Mutex<InternalState>>,
}

impl GatewayController {
    /// Set the behavior of `fetch_ticker` for one exchange.
    pub async fn set_ticker(&self, exchange: &str, behavior: MockBehavior<Ticker>) {
        let mut guard = self.state.lock().await;
        guard.ticker_rules.insert(id(exchange), behavior);
    }

    /// Set the behavior of `fetch_ohlcv` for one exchange.
    pub async fn set_ohlcv(&self, exchange: &str, behavior: MockBehavior<Vec<Candle>>) {
        let mut guard = self.state.lock().await;
        guard.ohlcv_rules.insert(id(exchange), behavior);
    }

    /// Every call made so far, in order.
    pub async fn calls(&self) -> Vec<GatewayCall> {
        self.state.lock().await.calls.clone()
    }

    /// Exchanges called so far, in order.
    pub async fn called_exchanges(&self) -> Vec<String> {
        let guard = self.state.lock().await;
        guard.calls.iter().map(|c| c.exchange.to_string()).collect()
    }

    /// Number of calls made so far.
    pub async fn call_count(&self) -> usize {
        self.state.lock().await.calls.len()
    }

    /// Clear all behaviors and the call log.
    pub async fn clear_all(&self) {
        let mut guard = self.state.lock().await;
        guard.ticker_rules.clear();
        guard.ohlcv_rules.clear();
        guard.calls.clear();
    }
}

// Test-only surface: ids come from literals in test code.
fn id(raw: &str) -> ExchangeId {
    ExchangeId::new(raw).unwrap_or_else(|e| panic!("bad exchange id in test: {e}"))
}

/// Gateway that defers all behavior to a [`GatewayController`].
///
/// Exchanges without an installed behavior fail with an upstream error.
pub struct DynamicGateway {
    supported: Vec<ExchangeId>,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicGateway {
    /// Create a gateway reaching `supported` and its controller.
    #[must_use]
    pub fn new_with_controller(
        supported: &[&str],
    ) -> (Arc<dyn ExchangeGateway>, GatewayController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = GatewayController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self {
            supported: supported.iter().map(|s| id(s)).collect(),
            state,
        });
        (me as Arc<dyn ExchangeGateway>, controller)
    }

    async fn log(&self, exchange: &ExchangeId, capability: Capability, symbol: &str) {
        self.state.lock().await.calls.push(GatewayCall {
            exchange: exchange.clone(),
            capability,
            symbol: symbol.to_string(),
        });
    }
}

#[async_trait]
impl ExchangeGateway for DynamicGateway {
    fn name(&self) -> &'static str {
        "cambio-mock"
    }

    fn supported(&self) -> Vec<ExchangeId> {
        self.supported.clone()
    }

    async fn fetch_ticker(
        &self,
        exchange: &ExchangeId,
        symbol: &str,
    ) -> Result<Ticker, CambioError> {
        self.log(exchange, Capability::Ticker, symbol).await;
        // Snapshot the behavior without holding the lock across the call
        let behavior = {
            let guard = self.state.lock().await;
            guard.ticker_rules.get(exchange).cloned()
        };
        match behavior {
            Some(b) => b.run().await,
            None => Err(CambioError::upstream(exchange.as_str(), "no ticker behavior")),
        }
    }

    async fn fetch_ohlcv(
        &self,
        exchange: &ExchangeId,
        symbol: &str,
        _timeframe: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Candle>, CambioError> {
        self.log(exchange, Capability::Ohlcv, symbol).await;
        let behavior = {
            let guard = self.state.lock().await;
            guard.ohlcv_rules.get(exchange).cloned()
        };
        let mut candles = match behavior {
            Some(b) => b.run().await?,
            None => return Err(CambioError::upstream(exchange.as_str(), "no ohlcv behavior")),
        };
        if let Some(limit) = limit.and_then(|l| usize::try_from(l).ok())
            && candles.len() > limit
        {
            candles.drain(..candles.len() - limit);
        }
        Ok(candles)
    }
}

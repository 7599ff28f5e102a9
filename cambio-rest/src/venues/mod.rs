//! Per-exchange REST API descriptions.
//!
//! A [`Venue`] never performs I/O. It names the endpoints to call and turns
//! the decoded JSON body into unified [`Ticker`]/[`Candle`] values; the
//! gateway owns the HTTP client and the request lifecycle.

mod binance;
mod huobi;
mod kraken;
mod kucoin;
mod okx;

use std::sync::Arc;

use cambio_core::{CambioError, Candle, Ticker};
use serde_json::Value;

pub use binance::Binance;
pub use huobi::Huobi;
pub use kraken::Kraken;
pub use kucoin::Kucoin;
pub use okx::Okx;

/// Path and query string of one venue request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Path below the venue base URL, starting with `/`.
    pub path: &'static str,
    /// Query parameters in send order.
    pub query: Vec<(&'static str, String)>,
}

impl Endpoint {
    pub(crate) fn new(path: &'static str) -> Self {
        Self {
            path,
            query: Vec::new(),
        }
    }

    pub(crate) fn param(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    pub(crate) fn param_opt(self, key: &'static str, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.param(key, v),
            None => self,
        }
    }
}

/// One exchange's public market-data REST API.
pub trait Venue: Send + Sync {
    /// Lowercase exchange identifier, e.g. `"okx"`.
    fn id(&self) -> &'static str;

    /// Production base URL.
    fn default_base_url(&self) -> &'static str;

    /// Unified timeframes mapped to the venue's interval parameter.
    fn intervals(&self) -> &'static [(&'static str, &'static str)];

    /// Venue market code for a unified `BASE/QUOTE` symbol.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the symbol is not of the form `BASE/QUOTE`.
    fn market(&self, symbol: &str) -> Result<String, CambioError>;

    /// Request for a 24h ticker snapshot.
    fn ticker(&self, market: &str) -> Endpoint;

    /// Request for OHLCV candles. `interval` comes from [`Venue::intervals`].
    fn ohlcv(&self, market: &str, interval: &str, limit: Option<u32>) -> Endpoint;

    /// Error message embedded in a response body, if the venue reported one.
    fn api_error(&self, body: &Value) -> Option<String>;

    /// Build a ticker from a successful response body.
    ///
    /// # Errors
    /// Returns `Data` when the body does not have the expected shape.
    fn parse_ticker(&self, symbol: &str, body: &Value) -> Result<Ticker, CambioError>;

    /// Extract candles from a successful response body, in any order.
    ///
    /// # Errors
    /// Returns `Data` when the body does not have the expected shape.
    fn parse_ohlcv(&self, body: &Value) -> Result<Vec<Candle>, CambioError>;

    /// Venue interval for a unified timeframe.
    fn interval(&self, timeframe: &str) -> Option<&'static str> {
        self.intervals()
            .iter()
            .find(|(tf, _)| *tf == timeframe)
            .map(|(_, iv)| *iv)
    }
}

/// Every venue shipped with the crate.
#[must_use]
pub fn builtin() -> Vec<Arc<dyn Venue>> {
    vec![
        Arc::new(Binance),
        Arc::new(Huobi),
        Arc::new(Kraken),
        Arc::new(Kucoin),
        Arc::new(Okx),
    ]
}

pub(crate) fn split_symbol(symbol: &str) -> Result<(String, String), CambioError> {
    let (base, quote) = symbol
        .trim()
        .split_once('/')
        .ok_or_else(|| CambioError::InvalidArg(format!("symbol {symbol:?} is not BASE/QUOTE")))?;
    if base.is_empty() || quote.is_empty() {
        return Err(CambioError::InvalidArg(format!(
            "symbol {symbol:?} is not BASE/QUOTE"
        )));
    }
    Ok((base.to_ascii_uppercase(), quote.to_ascii_uppercase()))
}

/// Exchanges send prices both as JSON numbers and as decimal strings.
pub(crate) fn num(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn int(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn field(v: &Value, key: &str) -> Option<f64> {
    v.get(key).and_then(num)
}

/// Read a candle out of a positional row.
///
/// `idx` holds the positions of `[ts, open, high, low, close, volume]`;
/// `ts_scale` converts the venue's time unit to milliseconds.
pub(crate) fn candle_at(row: &Value, idx: [usize; 6], ts_scale: i64) -> Option<Candle> {
    let [ts, o, h, l, c, v] = idx;
    let cell = |i: usize| row.get(i).and_then(num);
    Some(Candle {
        ts: row.get(ts).and_then(int)?.checked_mul(ts_scale)?,
        open: cell(o)?,
        high: cell(h)?,
        low: cell(l)?,
        close: cell(c)?,
        volume: cell(v)?,
    })
}

pub(crate) fn rows<'a>(venue: &str, body: Option<&'a Value>) -> Result<&'a Vec<Value>, CambioError> {
    body.and_then(Value::as_array)
        .ok_or_else(|| CambioError::Data(format!("{venue}: candle list missing from response")))
}

pub(crate) fn malformed_row(venue: &str) -> CambioError {
    CambioError::Data(format!("{venue}: malformed candle row"))
}

/// Sort oldest first, drop duplicate timestamps and keep the newest `limit`.
pub(crate) fn finish_series(mut candles: Vec<Candle>, limit: Option<u32>) -> Vec<Candle> {
    candles.sort_by_key(|c| c.ts);
    candles.dedup_by_key(|c| c.ts);
    if let Some(limit) = limit {
        let keep = usize::try_from(limit).unwrap_or(usize::MAX);
        if candles.len() > keep {
            candles.drain(..candles.len() - keep);
        }
    }
    candles
}

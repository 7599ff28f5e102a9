use cambio_core::{CambioError, Candle, Ticker};
use serde_json::Value;

use super::{Endpoint, Venue, candle_at, field, int, malformed_row, rows, split_symbol};

/// OKX `api/v5` market endpoints.
pub struct Okx;

const INTERVALS: &[(&str, &str)] = &[
    ("1m", "1m"),
    ("3m", "3m"),
    ("5m", "5m"),
    ("15m", "15m"),
    ("30m", "30m"),
    ("1h", "1H"),
    ("2h", "2H"),
    ("4h", "4H"),
    ("6h", "6Hutc"),
    ("12h", "12Hutc"),
    ("1d", "1Dutc"),
    ("1w", "1Wutc"),
    ("1M", "1Mutc"),
];

const MAX_CANDLES: u32 = 300;

impl Venue for Okx {
    fn id(&self) -> &'static str {
        "okx"
    }

    fn default_base_url(&self) -> &'static str {
        "https://www.okx.com"
    }

    fn intervals(&self) -> &'static [(&'static str, &'static str)] {
        INTERVALS
    }

    fn market(&self, symbol: &str) -> Result<String, CambioError> {
        let (base, quote) = split_symbol(symbol)?;
        Ok(format!("{base}-{quote}"))
    }

    fn ticker(&self, market: &str) -> Endpoint {
        Endpoint::new("/api/v5/market/ticker").param("instId", market)
    }

    fn ohlcv(&self, market: &str, interval: &str, limit: Option<u32>) -> Endpoint {
        Endpoint::new("/api/v5/market/candles")
            .param("instId", market)
            .param("bar", interval)
            .param_opt("limit", limit.map(|l| l.min(MAX_CANDLES)))
    }

    fn api_error(&self, body: &Value) -> Option<String> {
        let code = body.get("code")?.as_str()?;
        if code == "0" {
            return None;
        }
        match body.get("msg").and_then(Value::as_str) {
            Some(msg) if !msg.is_empty() => Some(msg.to_string()),
            _ => Some(format!("error code {code}")),
        }
    }

    fn parse_ticker(&self, symbol: &str, body: &Value) -> Result<Ticker, CambioError> {
        let d = body
            .get("data")
            .and_then(|d| d.get(0))
            .ok_or_else(|| CambioError::Data("okx: ticker missing from response".into()))?;
        Ok(Ticker {
            symbol: symbol.to_string(),
            timestamp: d.get("ts").and_then(int),
            high: field(d, "high24h"),
            low: field(d, "low24h"),
            bid: field(d, "bidPx"),
            ask: field(d, "askPx"),
            open: field(d, "open24h"),
            last: field(d, "last"),
            base_volume: field(d, "vol24h"),
            quote_volume: field(d, "volCcy24h"),
            ..Ticker::default()
        }
        .finalize())
    }

    fn parse_ohlcv(&self, body: &Value) -> Result<Vec<Candle>, CambioError> {
        // [ts_ms, o, h, l, c, vol, volCcy, volCcyQuote, confirm], newest first
        rows(self.id(), body.get("data"))?
            .iter()
            .map(|r| candle_at(r, [0, 1, 2, 3, 4, 5], 1).ok_or_else(|| malformed_row(self.id())))
            .collect()
    }
}

use cambio_core::{CambioError, Candle, Ticker};
use serde_json::Value;

use super::{Endpoint, Venue, field, int, malformed_row, num, rows, split_symbol};

/// Huobi (HTX) spot market API.
pub struct Huobi;

const INTERVALS: &[(&str, &str)] = &[
    ("1m", "1min"),
    ("5m", "5min"),
    ("15m", "15min"),
    ("30m", "30min"),
    ("1h", "60min"),
    ("4h", "4hour"),
    ("1d", "1day"),
    ("1w", "1week"),
    ("1M", "1mon"),
];

const MAX_SIZE: u32 = 2000;

impl Venue for Huobi {
    fn id(&self) -> &'static str {
        "huobi"
    }

    fn default_base_url(&self) -> &'static str {
        "https://api.huobi.pro"
    }

    fn intervals(&self) -> &'static [(&'static str, &'static str)] {
        INTERVALS
    }

    fn market(&self, symbol: &str) -> Result<String, CambioError> {
        let (base, quote) = split_symbol(symbol)?;
        Ok(format!("{base}{quote}").to_ascii_lowercase())
    }

    fn ticker(&self, market: &str) -> Endpoint {
        Endpoint::new("/market/detail/merged").param("symbol", market)
    }

    fn ohlcv(&self, market: &str, interval: &str, limit: Option<u32>) -> Endpoint {
        Endpoint::new("/market/history/kline")
            .param("symbol", market)
            .param("period", interval)
            .param_opt("size", limit.map(|l| l.min(MAX_SIZE)))
    }

    fn api_error(&self, body: &Value) -> Option<String> {
        if body.get("status").and_then(Value::as_str) != Some("error") {
            return None;
        }
        let msg = body
            .get("err-msg")
            .or_else(|| body.get("err-code"))
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        Some(msg.to_string())
    }

    fn parse_ticker(&self, symbol: &str, body: &Value) -> Result<Ticker, CambioError> {
        let tick = body
            .get("tick")
            .ok_or_else(|| CambioError::Data("huobi: tick missing from response".into()))?;
        let best = |side: &str| tick.get(side).and_then(|v| v.get(0)).and_then(num);
        Ok(Ticker {
            symbol: symbol.to_string(),
            timestamp: body.get("ts").and_then(int),
            high: field(tick, "high"),
            low: field(tick, "low"),
            bid: best("bid"),
            ask: best("ask"),
            open: field(tick, "open"),
            last: field(tick, "close"),
            base_volume: field(tick, "amount"),
            quote_volume: field(tick, "vol"),
            ..Ticker::default()
        }
        .finalize())
    }

    fn parse_ohlcv(&self, body: &Value) -> Result<Vec<Candle>, CambioError> {
        let candle = |k: &Value| {
            Some(Candle {
                ts: k.get("id").and_then(int)?.checked_mul(1000)?,
                open: field(k, "open")?,
                high: field(k, "high")?,
                low: field(k, "low")?,
                close: field(k, "close")?,
                volume: field(k, "amount")?,
            })
        };
        rows(self.id(), body.get("data"))?
            .iter()
            .map(|k| candle(k).ok_or_else(|| malformed_row(self.id())))
            .collect()
    }
}

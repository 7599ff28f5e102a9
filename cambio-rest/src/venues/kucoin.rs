use cambio_core::{CambioError, Candle, Ticker};
use serde_json::Value;

use super::{Endpoint, Venue, candle_at, field, int, malformed_row, rows, split_symbol};

/// KuCoin spot API.
pub struct Kucoin;

const INTERVALS: &[(&str, &str)] = &[
    ("1m", "1min"),
    ("3m", "3min"),
    ("5m", "5min"),
    ("15m", "15min"),
    ("30m", "30min"),
    ("1h", "1hour"),
    ("2h", "2hour"),
    ("4h", "4hour"),
    ("6h", "6hour"),
    ("8h", "8hour"),
    ("12h", "12hour"),
    ("1d", "1day"),
    ("1w", "1week"),
];

const OK: &str = "200000";

impl Venue for Kucoin {
    fn id(&self) -> &'static str {
        "kucoin"
    }

    fn default_base_url(&self) -> &'static str {
        "https://api.kucoin.com"
    }

    fn intervals(&self) -> &'static [(&'static str, &'static str)] {
        INTERVALS
    }

    fn market(&self, symbol: &str) -> Result<String, CambioError> {
        let (base, quote) = split_symbol(symbol)?;
        Ok(format!("{base}-{quote}"))
    }

    fn ticker(&self, market: &str) -> Endpoint {
        Endpoint::new("/api/v1/market/stats").param("symbol", market)
    }

    fn ohlcv(&self, market: &str, interval: &str, _limit: Option<u32>) -> Endpoint {
        Endpoint::new("/api/v1/market/candles")
            .param("symbol", market)
            .param("type", interval)
    }

    fn api_error(&self, body: &Value) -> Option<String> {
        let code = body.get("code")?.as_str()?;
        if code == OK {
            return None;
        }
        Some(
            body.get("msg")
                .and_then(Value::as_str)
                .map_or_else(|| format!("error code {code}"), str::to_string),
        )
    }

    fn parse_ticker(&self, symbol: &str, body: &Value) -> Result<Ticker, CambioError> {
        let d = body
            .get("data")
            .filter(|d| d.is_object())
            .ok_or_else(|| CambioError::Data("kucoin: data missing from response".into()))?;
        let last = field(d, "last");
        let change = field(d, "changePrice");
        Ok(Ticker {
            symbol: symbol.to_string(),
            timestamp: d.get("time").and_then(int),
            high: field(d, "high"),
            low: field(d, "low"),
            bid: field(d, "buy"),
            ask: field(d, "sell"),
            open: last.zip(change).map(|(l, c)| l - c),
            last,
            change,
            percentage: field(d, "changeRate").map(|r| r * 100.0),
            base_volume: field(d, "vol"),
            quote_volume: field(d, "volValue"),
            ..Ticker::default()
        }
        .finalize())
    }

    fn parse_ohlcv(&self, body: &Value) -> Result<Vec<Candle>, CambioError> {
        // [time_s, open, close, high, low, volume, turnover], newest first
        rows(self.id(), body.get("data"))?
            .iter()
            .map(|r| candle_at(r, [0, 1, 3, 4, 2, 5], 1000).ok_or_else(|| malformed_row(self.id())))
            .collect()
    }
}

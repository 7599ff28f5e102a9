use cambio_core::{CambioError, Candle, Ticker};
use serde_json::Value;

use super::{Endpoint, Venue, candle_at, field, int, malformed_row, rows, split_symbol};

/// Binance spot, `api/v3`.
pub struct Binance;

const INTERVALS: &[(&str, &str)] = &[
    ("1m", "1m"),
    ("3m", "3m"),
    ("5m", "5m"),
    ("15m", "15m"),
    ("30m", "30m"),
    ("1h", "1h"),
    ("2h", "2h"),
    ("4h", "4h"),
    ("6h", "6h"),
    ("8h", "8h"),
    ("12h", "12h"),
    ("1d", "1d"),
    ("3d", "3d"),
    ("1w", "1w"),
    ("1M", "1M"),
];

const MAX_KLINES: u32 = 1000;

impl Venue for Binance {
    fn id(&self) -> &'static str {
        "binance"
    }

    fn default_base_url(&self) -> &'static str {
        "https://api.binance.com"
    }

    fn intervals(&self) -> &'static [(&'static str, &'static str)] {
        INTERVALS
    }

    fn market(&self, symbol: &str) -> Result<String, CambioError> {
        let (base, quote) = split_symbol(symbol)?;
        Ok(format!("{base}{quote}"))
    }

    fn ticker(&self, market: &str) -> Endpoint {
        Endpoint::new("/api/v3/ticker/24hr").param("symbol", market)
    }

    fn ohlcv(&self, market: &str, interval: &str, limit: Option<u32>) -> Endpoint {
        Endpoint::new("/api/v3/klines")
            .param("symbol", market)
            .param("interval", interval)
            .param_opt("limit", limit.map(|l| l.min(MAX_KLINES)))
    }

    fn api_error(&self, body: &Value) -> Option<String> {
        // {"code":-1121,"msg":"Invalid symbol."}
        body.get("code")?;
        body.get("msg").and_then(Value::as_str).map(str::to_string)
    }

    fn parse_ticker(&self, symbol: &str, body: &Value) -> Result<Ticker, CambioError> {
        if !body.is_object() {
            return Err(CambioError::Data("binance: ticker is not an object".into()));
        }
        Ok(Ticker {
            symbol: symbol.to_string(),
            timestamp: body.get("closeTime").and_then(int),
            high: field(body, "highPrice"),
            low: field(body, "lowPrice"),
            bid: field(body, "bidPrice"),
            ask: field(body, "askPrice"),
            open: field(body, "openPrice"),
            last: field(body, "lastPrice"),
            change: field(body, "priceChange"),
            percentage: field(body, "priceChangePercent"),
            base_volume: field(body, "volume"),
            quote_volume: field(body, "quoteVolume"),
            ..Ticker::default()
        }
        .finalize())
    }

    fn parse_ohlcv(&self, body: &Value) -> Result<Vec<Candle>, CambioError> {
        rows(self.id(), Some(body))?
            .iter()
            .map(|r| candle_at(r, [0, 1, 2, 3, 4, 5], 1).ok_or_else(|| malformed_row(self.id())))
            .collect()
    }
}

use cambio_core::{CambioError, Candle, Ticker};
use serde_json::Value;

use super::{Endpoint, Venue, candle_at, malformed_row, num, rows, split_symbol};

/// Kraken public REST API.
///
/// Kraken names bitcoin `XBT` and keys its results by its own pair name, which
/// may differ from the one requested (`XBTUSD` answers as `XXBTZUSD`).
pub struct Kraken;

const INTERVALS: &[(&str, &str)] = &[
    ("1m", "1"),
    ("5m", "5"),
    ("15m", "15"),
    ("30m", "30"),
    ("1h", "60"),
    ("4h", "240"),
    ("1d", "1440"),
    ("1w", "10080"),
    ("2w", "21600"),
];

fn asset(code: &str) -> &str {
    match code {
        "BTC" => "XBT",
        "DOGE" => "XDG",
        other => other,
    }
}

/// The single pair entry of a `result` object.
fn pair_result(body: &Value) -> Result<&Value, CambioError> {
    body.get("result")
        .and_then(Value::as_object)
        .and_then(|m| m.iter().find(|(k, _)| k.as_str() != "last").map(|(_, v)| v))
        .ok_or_else(|| CambioError::Data("kraken: result missing from response".into()))
}

impl Venue for Kraken {
    fn id(&self) -> &'static str {
        "kraken"
    }

    fn default_base_url(&self) -> &'static str {
        "https://api.kraken.com"
    }

    fn intervals(&self) -> &'static [(&'static str, &'static str)] {
        INTERVALS
    }

    fn market(&self, symbol: &str) -> Result<String, CambioError> {
        let (base, quote) = split_symbol(symbol)?;
        Ok(format!("{}{}", asset(&base), asset(&quote)))
    }

    fn ticker(&self, market: &str) -> Endpoint {
        Endpoint::new("/0/public/Ticker").param("pair", market)
    }

    // OHLC has no count parameter; the gateway trims to `limit`.
    fn ohlcv(&self, market: &str, interval: &str, _limit: Option<u32>) -> Endpoint {
        Endpoint::new("/0/public/OHLC")
            .param("pair", market)
            .param("interval", interval)
    }

    fn api_error(&self, body: &Value) -> Option<String> {
        let errors = body.get("error")?.as_array()?;
        let msgs: Vec<&str> = errors.iter().filter_map(Value::as_str).collect();
        if msgs.is_empty() {
            None
        } else {
            Some(msgs.join("; "))
        }
    }

    fn parse_ticker(&self, symbol: &str, body: &Value) -> Result<Ticker, CambioError> {
        let t = pair_result(body)?;
        // Arrays hold [today, last 24h]; a/b/c hold price first.
        let at = |key: &str, i: usize| t.get(key).and_then(|v| v.get(i)).and_then(num);
        let base_volume = at("v", 1);
        let vwap = at("p", 1);
        Ok(Ticker {
            symbol: symbol.to_string(),
            high: at("h", 1),
            low: at("l", 1),
            bid: at("b", 0),
            ask: at("a", 0),
            open: t.get("o").and_then(num),
            last: at("c", 0),
            base_volume,
            quote_volume: base_volume.zip(vwap).map(|(v, p)| v * p),
            ..Ticker::default()
        }
        .finalize())
    }

    fn parse_ohlcv(&self, body: &Value) -> Result<Vec<Candle>, CambioError> {
        // [time_s, open, high, low, close, vwap, volume, count]
        rows(self.id(), Some(pair_result(body)?))?
            .iter()
            .map(|r| candle_at(r, [0, 1, 2, 3, 4, 6], 1000).ok_or_else(|| malformed_row(self.id())))
            .collect()
    }
}

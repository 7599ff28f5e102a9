//! Deterministic market data for tests.

use cambio_core::{Candle, Ticker};

const HOUR_MS: i64 = 3_600_000;

/// `n` hourly candles starting at `start_ms`, oldest first.
///
/// Prices rise by one per candle from `base`, so series from different
/// exchanges can be told apart by their first open.
#[must_use]
pub fn candles(n: usize, start_ms: i64, base: f64) -> Vec<Candle> {
    (0..n)
        .map(|i| {
            let step = i as f64;
            Candle {
                ts: start_ms + i as i64 * HOUR_MS,
                open: base + step,
                high: base + step + 0.5,
                low: base + step - 0.5,
                close: base + step + 0.25,
                volume: 10.0 + step,
            }
        })
        .collect()
}

/// Ticker with `last` set and the derived fields filled in.
#[must_use]
pub fn ticker(symbol: &str, last: f64) -> Ticker {
    Ticker {
        symbol: symbol.to_string(),
        timestamp: Some(1_700_000_000_000),
        open: Some(last - 1.0),
        high: Some(last + 1.0),
        low: Some(last - 2.0),
        bid: Some(last - 0.1),
        ask: Some(last + 0.1),
        last: Some(last),
        base_volume: Some(100.0),
        ..Ticker::default()
    }
    .finalize()
}

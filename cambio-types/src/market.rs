//! Unified market data shapes returned by every exchange venue.

use serde::{Deserialize, Serialize};

/// Point-in-time ticker snapshot in a venue-independent shape.
///
/// Fields an exchange does not report are left as `None` and serialize as
/// `null`, so clients can rely on a stable key set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker {
    /// Unified symbol, e.g. `BTC/USDT`.
    pub symbol: String,
    /// Snapshot time in Unix milliseconds.
    pub timestamp: Option<i64>,
    /// Snapshot time as an RFC 3339 string.
    pub datetime: Option<String>,
    /// 24h high.
    pub high: Option<f64>,
    /// 24h low.
    pub low: Option<f64>,
    /// Best bid.
    pub bid: Option<f64>,
    /// Best ask.
    pub ask: Option<f64>,
    /// Opening price of the 24h window.
    pub open: Option<f64>,
    /// Closing price (same as `last`).
    pub close: Option<f64>,
    /// Last traded price.
    pub last: Option<f64>,
    /// Absolute change over the 24h window.
    pub change: Option<f64>,
    /// Percentage change over the 24h window.
    pub percentage: Option<f64>,
    /// 24h volume in the base currency.
    pub base_volume: Option<f64>,
    /// 24h volume in the quote currency.
    pub quote_volume: Option<f64>,
}

impl Ticker {
    /// Fill `timestamp`, `datetime` and the derived change fields where possible.
    #[must_use]
    pub fn finalize(mut self) -> Self {
        if self.close.is_none() {
            self.close = self.last;
        }
        if let Some(ts) = self.timestamp
            && self.datetime.is_none()
        {
            self.datetime = chrono::DateTime::from_timestamp_millis(ts)
                .map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true));
        }
        if let (Some(open), Some(last)) = (self.open, self.last) {
            if self.change.is_none() {
                self.change = Some(last - open);
            }
            if self.percentage.is_none() && open != 0.0 {
                self.percentage = Some((last - open) / open * 100.0);
            }
        }
        self
    }
}

type CandleRow = (i64, f64, f64, f64, f64, f64);

/// One OHLCV candle.
///
/// Serialized as a `[timestamp_ms, open, high, low, close, volume]` row, the
/// layout charting clients expect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "CandleRow", into = "CandleRow")]
pub struct Candle {
    /// Candle open time in Unix milliseconds.
    pub ts: i64,
    /// Open price.
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Close price.
    pub close: f64,
    /// Traded volume in the base currency.
    pub volume: f64,
}

impl From<CandleRow> for Candle {
    fn from((ts, open, high, low, close, volume): CandleRow) -> Self {
        Self {
            ts,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

impl From<Candle> for CandleRow {
    fn from(c: Candle) -> Self {
        (c.ts, c.open, c.high, c.low, c.close, c.volume)
    }
}

/// Result of a single exchange fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarketData {
    /// Ticker snapshot.
    Ticker(Ticker),
    /// OHLCV series, oldest candle first.
    Ohlcv(Vec<Candle>),
}

impl MarketData {
    /// Returns true for an OHLCV series without candles.
    ///
    /// A ticker is never considered empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Ticker(_) => false,
            Self::Ohlcv(candles) => candles.is_empty(),
        }
    }
}

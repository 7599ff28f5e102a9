//! cambio-specific data transfer objects and configuration primitives.
#![warn(missing_docs)]

mod capability;
mod config;
mod error;
mod exchange;
mod ledger;
mod market;
mod request;

pub use capability::Capability;
pub use config::{CacheConfig, ForexConfig, ResolverConfig};
pub use error::CambioError;
pub use exchange::ExchangeId;
pub use ledger::{Attempt, AttemptLedger};
pub use market::{Candle, MarketData, Ticker};
pub use request::{ForexResult, QuoteRequest, QuoteResult};

//! Re-export of foundational types from `cambio-types`.
// Consolidated re-exports so downstream crates can depend on `cambio-core` only

pub use cambio_types::{CambioError, Capability, ExchangeId};

pub use cambio_types::{Attempt, AttemptLedger};
pub use cambio_types::{CacheConfig, ForexConfig, ResolverConfig};
pub use cambio_types::{Candle, MarketData, Ticker};
pub use cambio_types::{ForexResult, QuoteRequest, QuoteResult};

//! cambio resolves market-data requests against upstream APIs behind a
//! short-lived cache.
//!
//! Overview
//! - [`QuoteResolver`] serves crypto tickers and OHLCV candles. It checks the
//!   cache, then the hinted exchange, then falls back through an ordered
//!   priority list until one exchange returns non-empty data.
//! - [`ForexRelay`] forwards forex calls to one upstream host and caches
//!   successful bodies.
//!
//! Key behaviors
//! - The cache key is derived from the normalized request only, so a result
//!   served by a fallback exchange is cached under the originally requested
//!   exchange.
//! - Each exchange is tried at most once per request. Every attempt is bounded
//!   by the provider timeout and the whole request by the request timeout.
//! - When every attempt fails the error carries a ledger naming each exchange
//!   tried and why it failed.
//!
//! Example
//! ```rust,ignore
//! use std::sync::Arc;
//! use cambio::{QuoteResolver, QuoteRequest};
//! use cambio_rest::RestGateway;
//!
//! let resolver = QuoteResolver::builder()
//!     .with_gateway(Arc::new(RestGateway::new()?))
//!     .build()?;
//! let res = resolver
//!     .resolve(&QuoteRequest::new("BTC/USDT").timeframe("1h").limit(10))
//!     .await?;
//! println!("{} answered", res.used_exchange);
//! ```
#![warn(missing_docs)]

mod core;
mod router;

pub use crate::core::{QuoteResolver, QuoteResolverBuilder};
pub use crate::router::forex::{ForexRelay, ForexRelayBuilder};

pub use cambio_cache::{CacheStore, TtlCache};
pub use cambio_core::{
    AttemptLedger, CacheKey, CambioError, ExchangeId, ForexConfig, ForexResult, QueryParams,
    QuoteRequest, QuoteResult, ResolverConfig,
};

//! cambio-core
//!
//! Core types, traits, and utilities shared across the cambio workspace.
//!
//! - `connector`: the `ExchangeGateway` and `ForexUpstream` seams that
//!   upstream implementations plug into.
//! - `key`: deterministic cache-key derivation for crypto and forex requests.
//! - `types`: re-exports of the data transfer objects from `cambio-types`.
#![warn(missing_docs)]

/// Upstream capability traits.
pub mod connector;
/// Cache key derivation.
pub mod key;
pub mod types;

pub use connector::{ExchangeGateway, ForexUpstream, QueryParams};
pub use key::CacheKey;
pub use types::*;

//! Configuration types shared across orchestrators and connectors.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ExchangeId;

/// Default fallback priority, highest first.
pub(crate) const AVAILABLE_EXCHANGES: [&str; 4] = ["huobi", "kraken", "kucoin", "okx"];

/// Configuration for the crypto quote resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Walk the remaining `priority` entries when the selected exchange fails.
    pub fallback_enabled: bool,
    /// Fallback-eligible exchanges, highest priority first.
    ///
    /// The first entry is the default when a request carries no usable hint.
    pub priority: Vec<ExchangeId>,
    /// Hints that are replaced by the default exchange instead of being honoured.
    pub hints_mapped_to_default: BTreeSet<ExchangeId>,
    /// Lifetime of a cached crypto response.
    pub cache_ttl: Duration,
    /// Timeout for an individual exchange call.
    pub provider_timeout: Duration,
    /// Optional bound on the whole resolution including every fallback attempt.
    pub request_timeout: Option<Duration>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fallback_enabled: true,
            priority: AVAILABLE_EXCHANGES
                .iter()
                .map(|id| ExchangeId::from_static(id))
                .collect(),
            hints_mapped_to_default: BTreeSet::from([ExchangeId::from_static("binance")]),
            cache_ttl: Duration::from_secs(30),
            provider_timeout: Duration::from_secs(15),
            request_timeout: Some(Duration::from_secs(60)),
        }
    }
}

impl ResolverConfig {
    /// Single-exchange variant: hints are honoured verbatim and never fall back.
    ///
    /// Without a fallback chain each call gets the longer 30s timeout.
    #[must_use]
    pub fn direct() -> Self {
        Self {
            fallback_enabled: false,
            hints_mapped_to_default: BTreeSet::new(),
            provider_timeout: Duration::from_secs(30),
            ..Self::default()
        }
    }

    /// Exchange used when the request has no usable hint.
    #[must_use]
    pub fn default_exchange(&self) -> Option<&ExchangeId> {
        self.priority.first()
    }
}

/// Configuration for the forex relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForexConfig {
    /// Upstream base URL; request paths are appended verbatim.
    pub base_url: String,
    /// Lifetime of a cached forex response.
    pub cache_ttl: Duration,
    /// Timeout for a single upstream call.
    pub timeout: Duration,
}

impl Default for ForexConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api-demo.fxcm.com".to_string(),
            cache_ttl: Duration::from_secs(60),
            timeout: Duration::from_secs(15),
        }
    }
}

/// Configuration for the shared in-memory cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of live entries; older entries are evicted beyond it.
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
        }
    }
}

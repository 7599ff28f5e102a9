// Re-export helpers so tests can `use crate::helpers::*;`
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use cambio::{CacheKey, CacheStore, QuoteResolver, ResolverConfig, TtlCache};
use cambio_mock::{DynamicGateway, GatewayController};
use serde_json::Value;

/// Every exchange the mock gateway can reach.
pub const ALL: &[&str] = &["binance", "huobi", "kraken", "kucoin", "okx"];

pub const BTC_USDT: &str = "BTC/USDT";

/// Cache wrapper counting reads and writes.
#[derive(Default)]
pub struct CountingCache {
    inner: TtlCache,
    gets: AtomicUsize,
    sets: AtomicUsize,
}

impl CountingCache {
    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheStore for CountingCache {
    async fn get(&self, key: &CacheKey) -> Option<Value> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key).await
    }

    async fn set(&self, key: CacheKey, value: Value, ttl: Duration) {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value, ttl).await;
    }
}

pub struct Harness {
    pub resolver: QuoteResolver,
    pub gateway: GatewayController,
    pub cache: Arc<CountingCache>,
}

/// Resolver over a mock gateway reaching `supported`, with a counting cache.
pub fn harness_with(supported: &[&str], cfg: ResolverConfig) -> Harness {
    let (gw, gateway) = DynamicGateway::new_with_controller(supported);
    let cache = Arc::new(CountingCache::default());
    let resolver = QuoteResolver::builder()
        .with_gateway(gw)
        .cache(Arc::clone(&cache) as Arc<dyn CacheStore>)
        .config(cfg)
        .build()
        .expect("valid resolver config");
    Harness {
        resolver,
        gateway,
        cache,
    }
}

/// Fallback resolver over every exchange.
pub fn harness() -> Harness {
    harness_with(ALL, ResolverConfig::default())
}

/// Direct (no fallback) resolver over every exchange.
pub fn direct_harness() -> Harness {
    harness_with(ALL, ResolverConfig::direct())
}

pub fn id(s: &str) -> cambio::ExchangeId {
    cambio::ExchangeId::new(s).expect("valid test exchange id")
}

/// First open of a candle series, as encoded in the JSON result.
pub fn first_open(data: &Value) -> f64 {
    data[0][1].as_f64().expect("candle row")
}

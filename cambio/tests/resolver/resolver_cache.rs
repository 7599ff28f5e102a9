use std::time::Duration;

use cambio::{QuoteRequest, ResolverConfig};
use cambio_mock::{MockBehavior, fixtures};

use crate::helpers::{ALL, BTC_USDT, first_open, harness, harness_with, id};

#[tokio::test]
async fn second_identical_request_is_served_from_cache() {
    let h = harness();
    h.gateway
        .set_ohlcv("huobi", MockBehavior::Return(fixtures::candles(5, 0, 100.0)))
        .await;
    let req = QuoteRequest::new(BTC_USDT).timeframe("1h").limit(5);

    let first = h.resolver.resolve(&req).await.unwrap();
    let second = h.resolver.resolve(&req).await.unwrap();

    assert!(!first.from_cache);
    assert!(second.from_cache);
    assert_eq!(first.data, second.data);
    assert_eq!(second.used_exchange, id("huobi"));
    assert_eq!(second.original_exchange, id("huobi"));
    assert_eq!(h.gateway.call_count().await, 1, "cache hit must not reach the gateway");
}

#[tokio::test]
async fn cache_hit_skips_gateway_even_when_exchange_now_fails() {
    let h = harness();
    h.gateway
        .set_ticker("huobi", MockBehavior::Return(fixtures::ticker(BTC_USDT, 42.0)))
        .await;
    let req = QuoteRequest::new(BTC_USDT);
    h.resolver.resolve(&req).await.unwrap();

    h.gateway
        .set_ticker("huobi", MockBehavior::fail("huobi", "down"))
        .await;
    let cached = h.resolver.resolve(&req).await.unwrap();
    assert!(cached.from_cache);
    assert_eq!(cached.data["last"], 42.0);
    assert_eq!(h.gateway.call_count().await, 1);
}

#[tokio::test]
async fn fallback_result_is_cached_under_original_exchange() {
    let h = harness();
    h.gateway
        .set_ohlcv("huobi", MockBehavior::fail("huobi", "maintenance"))
        .await;
    h.gateway
        .set_ohlcv("kraken", MockBehavior::Return(fixtures::candles(3, 0, 200.0)))
        .await;
    let req = QuoteRequest::new(BTC_USDT).timeframe("1h").limit(3);

    let live = h.resolver.resolve(&req).await.unwrap();
    assert_eq!(live.used_exchange, id("kraken"));
    assert_eq!(live.original_exchange, id("huobi"));

    let cached = h.resolver.resolve(&req).await.unwrap();
    assert!(cached.from_cache);
    assert_eq!(cached.used_exchange, id("huobi"));
    assert_eq!(cached.original_exchange, id("huobi"));
    assert!((first_open(&cached.data) - 200.0).abs() < f64::EPSILON);
    assert_eq!(h.cache.sets(), 1, "only the final success is written");
}

#[tokio::test]
async fn different_limit_is_a_different_cache_entry() {
    let h = harness();
    h.gateway
        .set_ohlcv("huobi", MockBehavior::Return(fixtures::candles(10, 0, 1.0)))
        .await;
    let a = h
        .resolver
        .resolve(&QuoteRequest::new(BTC_USDT).timeframe("1h").limit(10))
        .await
        .unwrap();
    let b = h
        .resolver
        .resolve(&QuoteRequest::new(BTC_USDT).timeframe("1h").limit(4))
        .await
        .unwrap();
    assert!(!a.from_cache && !b.from_cache);
    assert_eq!(a.data.as_array().unwrap().len(), 10);
    assert_eq!(b.data.as_array().unwrap().len(), 4);
    assert_eq!(h.gateway.call_count().await, 2);
}

#[tokio::test]
async fn expired_entry_is_refetched() {
    let cfg = ResolverConfig {
        cache_ttl: Duration::from_millis(60),
        ..ResolverConfig::default()
    };
    let h = harness_with(ALL, cfg);
    h.gateway
        .set_ticker("huobi", MockBehavior::Return(fixtures::ticker(BTC_USDT, 1.0)))
        .await;
    let req = QuoteRequest::new(BTC_USDT);

    h.resolver.resolve(&req).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    let again = h.resolver.resolve(&req).await.unwrap();
    assert!(!again.from_cache);
    assert_eq!(h.gateway.call_count().await, 2);
}

#[tokio::test]
async fn zero_ttl_never_serves_from_cache() {
    let cfg = ResolverConfig {
        cache_ttl: Duration::ZERO,
        ..ResolverConfig::default()
    };
    let h = harness_with(ALL, cfg);
    h.gateway
        .set_ticker("huobi", MockBehavior::Return(fixtures::ticker(BTC_USDT, 1.0)))
        .await;
    let req = QuoteRequest::new(BTC_USDT);
    for _ in 0..3 {
        assert!(!h.resolver.resolve(&req).await.unwrap().from_cache);
    }
    assert_eq!(h.gateway.call_count().await, 3);
}

#[tokio::test]
async fn cached_result_outlives_upstream_rules() {
    let h = harness();
    h.gateway
        .set_ticker("huobi", MockBehavior::Return(fixtures::ticker(BTC_USDT, 7.0)))
        .await;
    let req = QuoteRequest::new(BTC_USDT);
    h.resolver.resolve(&req).await.unwrap();

    // no rules left: any gateway call would fail
    h.gateway.clear_all().await;
    let cached = h.resolver.resolve(&req).await.unwrap();
    assert!(cached.from_cache);
    assert_eq!(cached.data["last"], 7.0);
    assert_eq!(h.gateway.call_count().await, 0);
}

use std::time::{Duration, Instant};

use cambio::{CambioError, QuoteRequest, ResolverConfig};
use cambio_mock::{MockBehavior, fixtures};

use crate::helpers::{ALL, BTC_USDT, harness_with, id};

#[tokio::test]
async fn hung_exchange_times_out_and_fallback_continues() {
    let cfg = ResolverConfig {
        provider_timeout: Duration::from_millis(50),
        ..ResolverConfig::default()
    };
    let h = harness_with(ALL, cfg);
    h.gateway.set_ohlcv("huobi", MockBehavior::Hang).await;
    h.gateway
        .set_ohlcv("kraken", MockBehavior::Return(fixtures::candles(2, 0, 1.0)))
        .await;

    let res = h
        .resolver
        .resolve(&QuoteRequest::new(BTC_USDT).timeframe("1h"))
        .await
        .unwrap();
    assert_eq!(res.used_exchange, id("kraken"));
}

#[tokio::test]
async fn timeout_is_recorded_in_ledger() {
    let cfg = ResolverConfig {
        provider_timeout: Duration::from_millis(30),
        fallback_enabled: false,
        ..ResolverConfig::default()
    };
    let h = harness_with(ALL, cfg);
    h.gateway.set_ohlcv("huobi", MockBehavior::Hang).await;

    let err = h
        .resolver
        .resolve(&QuoteRequest::new(BTC_USDT).timeframe("1h"))
        .await
        .unwrap_err();
    let CambioError::AllExchangesFailed { ledger } = err else {
        panic!("expected AllExchangesFailed, got {err:?}");
    };
    assert_eq!(ledger.get(&id("huobi")), Some("ohlcv request timed out"));
}

#[tokio::test]
async fn request_deadline_stops_the_chain_with_partial_ledger() {
    let cfg = ResolverConfig {
        provider_timeout: Duration::from_millis(80),
        request_timeout: Some(Duration::from_millis(120)),
        ..ResolverConfig::default()
    };
    let h = harness_with(ALL, cfg);
    for ex in ["huobi", "kraken", "kucoin", "okx"] {
        h.gateway.set_ticker(ex, MockBehavior::Hang).await;
    }

    let started = Instant::now();
    let err = h
        .resolver
        .resolve(&QuoteRequest::new(BTC_USDT))
        .await
        .unwrap_err();
    let elapsed = started.elapsed();

    let CambioError::AllExchangesFailed { ledger } = err else {
        panic!("expected AllExchangesFailed, got {err:?}");
    };
    // huobi uses its full 80ms, kraken gets the remaining ~40ms, then the deadline hits
    assert_eq!(ledger.attempted(), vec![id("huobi"), id("kraken")]);
    assert!(elapsed < Duration::from_millis(400), "took {elapsed:?}");
}

#[tokio::test]
async fn slow_success_within_budget_is_accepted() {
    let cfg = ResolverConfig {
        provider_timeout: Duration::from_millis(500),
        ..ResolverConfig::default()
    };
    let h = harness_with(ALL, cfg);
    h.gateway
        .set_ticker(
            "huobi",
            MockBehavior::Slow(Duration::from_millis(20), fixtures::ticker(BTC_USDT, 9.0)),
        )
        .await;
    let res = h
        .resolver
        .resolve(&QuoteRequest::new(BTC_USDT))
        .await
        .unwrap();
    assert_eq!(res.used_exchange, id("huobi"));
}

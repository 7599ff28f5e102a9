use cambio::{CambioError, QuoteRequest};
use cambio_core::Capability;
use cambio_mock::{MockBehavior, fixtures};

use crate::helpers::{BTC_USDT, direct_harness, first_open, harness, harness_with, id};

#[tokio::test]
async fn default_exchange_then_next_in_priority() {
    // BTC/USDT 1h x10 with no hint: huobi fails, kraken answers.
    let h = harness();
    h.gateway
        .set_ohlcv("huobi", MockBehavior::fail("huobi", "boom"))
        .await;
    h.gateway
        .set_ohlcv("kraken", MockBehavior::Return(fixtures::candles(25, 0, 7.0)))
        .await;
    h.gateway
        .set_ohlcv("kucoin", MockBehavior::Return(fixtures::candles(25, 0, 9.0)))
        .await;

    let res = h
        .resolver
        .resolve(&QuoteRequest::new(BTC_USDT).timeframe("1h").limit(10))
        .await
        .unwrap();

    assert_eq!(res.used_exchange, id("kraken"));
    assert_eq!(res.original_exchange, id("huobi"));
    assert!(!res.from_cache);
    assert!(res.data.as_array().unwrap().len() <= 10);
    assert_eq!(h.gateway.called_exchanges().await, ["huobi", "kraken"]);
}

#[tokio::test]
async fn hinted_exchange_failure_falls_back_in_priority_order() {
    let h = harness();
    h.gateway
        .set_ohlcv("kucoin", MockBehavior::fail("kucoin", "bad gateway"))
        .await;
    h.gateway
        .set_ohlcv("huobi", MockBehavior::fail("huobi", "bad gateway"))
        .await;
    h.gateway
        .set_ohlcv("kraken", MockBehavior::Return(fixtures::candles(2, 0, 3.0)))
        .await;

    let res = h
        .resolver
        .resolve(&QuoteRequest::new(BTC_USDT).exchange(id("kucoin")).timeframe("1h"))
        .await
        .unwrap();
    assert_eq!(res.used_exchange, id("kraken"));
    assert_eq!(res.original_exchange, id("kucoin"));
    // kucoin is not retried when its turn in the priority list comes
    assert_eq!(h.gateway.called_exchanges().await, ["kucoin", "huobi", "kraken"]);
}

#[tokio::test]
async fn all_failing_reports_every_attempt() {
    let h = harness();
    for ex in ["huobi", "kraken", "kucoin", "okx"] {
        h.gateway
            .set_ticker(ex, MockBehavior::fail(ex, &format!("{ex} unavailable")))
            .await;
    }

    let err = h
        .resolver
        .resolve(&QuoteRequest::new(BTC_USDT))
        .await
        .unwrap_err();
    let CambioError::AllExchangesFailed { ledger } = err else {
        panic!("expected AllExchangesFailed, got {err:?}");
    };
    assert_eq!(
        ledger.attempted(),
        vec![id("huobi"), id("kraken"), id("kucoin"), id("okx")]
    );
    assert_eq!(ledger.get(&id("okx")), Some("okx unavailable"));
    assert_eq!(h.cache.sets(), 0, "failures are never cached");
}

#[tokio::test]
async fn empty_series_counts_as_failure() {
    let h = harness();
    h.gateway
        .set_ohlcv("huobi", MockBehavior::Return(vec![]))
        .await;
    h.gateway
        .set_ohlcv("kraken", MockBehavior::Return(fixtures::candles(4, 0, 50.0)))
        .await;

    let res = h
        .resolver
        .resolve(&QuoteRequest::new(BTC_USDT).timeframe("1h"))
        .await
        .unwrap();
    assert_eq!(res.used_exchange, id("kraken"));
    assert!((first_open(&res.data) - 50.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn empty_series_everywhere_is_all_failed() {
    let h = harness();
    for ex in ["huobi", "kraken", "kucoin", "okx"] {
        h.gateway.set_ohlcv(ex, MockBehavior::Return(vec![])).await;
    }
    let err = h
        .resolver
        .resolve(&QuoteRequest::new(BTC_USDT).timeframe("1d"))
        .await
        .unwrap_err();
    let CambioError::AllExchangesFailed { ledger } = err else {
        panic!("expected AllExchangesFailed, got {err:?}");
    };
    assert_eq!(ledger.len(), 4);
    assert!(ledger.iter().all(|a| a.error.contains("empty result")));
}

#[tokio::test]
async fn ticker_requests_use_ticker_capability() {
    let h = harness();
    h.gateway
        .set_ticker("huobi", MockBehavior::Return(fixtures::ticker(BTC_USDT, 10.0)))
        .await;
    let res = h
        .resolver
        .resolve(&QuoteRequest::new(BTC_USDT))
        .await
        .unwrap();
    assert_eq!(res.data["symbol"], BTC_USDT);
    assert_eq!(res.data["last"], 10.0);
    let calls = h.gateway.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].capability, Capability::Ticker);
}

#[tokio::test]
async fn direct_mode_does_not_fall_back() {
    let h = direct_harness();
    h.gateway
        .set_ticker("huobi", MockBehavior::fail("huobi", "boom"))
        .await;
    h.gateway
        .set_ticker("kraken", MockBehavior::Return(fixtures::ticker(BTC_USDT, 1.0)))
        .await;

    let err = h
        .resolver
        .resolve(&QuoteRequest::new(BTC_USDT))
        .await
        .unwrap_err();
    let CambioError::AllExchangesFailed { ledger } = err else {
        panic!("expected AllExchangesFailed, got {err:?}");
    };
    assert_eq!(ledger.attempted(), vec![id("huobi")]);
    assert_eq!(ledger.get(&id("huobi")), Some("boom"));
    assert_eq!(h.gateway.call_count().await, 1);
}

#[tokio::test]
async fn hint_outside_priority_list_does_not_fall_back() {
    let h = harness_with(
        &["gemini", "huobi", "kraken", "kucoin", "okx"],
        cambio::ResolverConfig::default(),
    );
    h.gateway
        .set_ticker("gemini", MockBehavior::fail("gemini", "maintenance"))
        .await;
    h.gateway
        .set_ticker("huobi", MockBehavior::Return(fixtures::ticker(BTC_USDT, 1.0)))
        .await;

    let err = h
        .resolver
        .resolve(&QuoteRequest::new(BTC_USDT).exchange(id("gemini")))
        .await
        .unwrap_err();
    let CambioError::AllExchangesFailed { ledger } = err else {
        panic!("expected AllExchangesFailed, got {err:?}");
    };
    assert_eq!(ledger.attempted(), vec![id("gemini")]);
    assert_eq!(ledger.get(&id("gemini")), Some("maintenance"));
    assert_eq!(h.gateway.called_exchanges().await, ["gemini"]);
}

#[tokio::test]
async fn unreachable_fallback_candidate_is_recorded_without_a_call() {
    // kraken is in the priority list but the gateway cannot reach it
    let h = harness_with(
        &["huobi", "kucoin", "okx"],
        cambio::ResolverConfig::default(),
    );
    h.gateway
        .set_ticker("huobi", MockBehavior::fail("huobi", "boom"))
        .await;
    h.gateway
        .set_ticker("kucoin", MockBehavior::Return(fixtures::ticker(BTC_USDT, 5.0)))
        .await;

    let res = h
        .resolver
        .resolve(&QuoteRequest::new(BTC_USDT))
        .await
        .unwrap();
    assert_eq!(res.used_exchange, id("kucoin"));
    assert_eq!(h.gateway.called_exchanges().await, ["huobi", "kucoin"]);
}

use cambio::{CambioError, QuoteRequest};
use cambio_mock::{MockBehavior, fixtures};

use crate::helpers::{BTC_USDT, direct_harness, harness, id};

#[tokio::test]
async fn missing_hint_uses_default_exchange() {
    let h = harness();
    h.gateway
        .set_ticker("huobi", MockBehavior::Return(fixtures::ticker(BTC_USDT, 1.0)))
        .await;
    let res = h
        .resolver
        .resolve(&QuoteRequest::new(BTC_USDT))
        .await
        .unwrap();
    assert_eq!(res.used_exchange, id("huobi"));
    assert_eq!(res.original_exchange, id("huobi"));
}

#[tokio::test]
async fn binance_hint_is_served_by_default_exchange_in_fallback_mode() {
    let h = harness();
    h.gateway
        .set_ticker("huobi", MockBehavior::Return(fixtures::ticker(BTC_USDT, 1.0)))
        .await;
    h.gateway
        .set_ticker("binance", MockBehavior::Return(fixtures::ticker(BTC_USDT, 2.0)))
        .await;

    let res = h
        .resolver
        .resolve(&QuoteRequest::new(BTC_USDT).exchange(id("binance")))
        .await
        .unwrap();
    assert_eq!(res.used_exchange, id("huobi"));
    assert_eq!(res.original_exchange, id("huobi"));
    assert_eq!(h.gateway.called_exchanges().await, ["huobi"]);
}

#[tokio::test]
async fn binance_hint_is_honoured_by_direct_mode() {
    let h = direct_harness();
    h.gateway
        .set_ticker("binance", MockBehavior::Return(fixtures::ticker(BTC_USDT, 2.0)))
        .await;

    let res = h
        .resolver
        .resolve(&QuoteRequest::new(BTC_USDT).exchange(id("binance")))
        .await
        .unwrap();
    assert_eq!(res.used_exchange, id("binance"));
    assert_eq!(res.data["last"], 2.0);
}

#[tokio::test]
async fn hint_is_case_insensitive() {
    let h = harness();
    h.gateway
        .set_ticker("okx", MockBehavior::Return(fixtures::ticker(BTC_USDT, 3.0)))
        .await;
    let req = QuoteRequest::from_params(Some(" OKX "), Some(BTC_USDT), None, None).unwrap();
    let res = h.resolver.resolve(&req).await.unwrap();
    assert_eq!(res.used_exchange, id("okx"));
}

#[tokio::test]
async fn unsupported_hint_lists_priority() {
    let h = harness();
    let err = h
        .resolver
        .resolve(&QuoteRequest::new(BTC_USDT).exchange(id("bitstamp")))
        .await
        .unwrap_err();
    match err {
        CambioError::UnsupportedExchange {
            exchange,
            supported,
        } => {
            assert_eq!(exchange, "bitstamp");
            assert_eq!(
                supported,
                vec![id("huobi"), id("kraken"), id("kucoin"), id("okx")]
            );
        }
        other => panic!("expected UnsupportedExchange, got {other:?}"),
    }
    assert_eq!(h.gateway.call_count().await, 0);
    assert_eq!(h.cache.sets(), 0);
}

use std::sync::Arc;
use std::time::Duration;

use cambio::{CambioError, QuoteRequest, QuoteResolver, ResolverConfig};
use cambio_mock::DynamicGateway;

use crate::helpers::{ALL, harness, id};

#[tokio::test]
async fn missing_symbol_is_rejected_before_cache_access() {
    let h = harness();
    for symbol in ["", "   "] {
        let err = h
            .resolver
            .resolve(&QuoteRequest::new(symbol))
            .await
            .unwrap_err();
        assert!(matches!(err, CambioError::InvalidArg(_)), "{err:?}");
        assert!(err.is_client_error());
    }
    assert_eq!(h.cache.gets(), 0);
    assert_eq!(h.cache.sets(), 0);
    assert_eq!(h.gateway.call_count().await, 0);
}

#[test]
fn builder_requires_gateway() {
    let err = QuoteResolver::builder().build().err().unwrap();
    assert!(matches!(err, CambioError::InvalidArg(_)));
}

#[test]
fn builder_rejects_empty_or_duplicate_priority() {
    let (gw, _ctl) = DynamicGateway::new_with_controller(ALL);
    let empty = QuoteResolver::builder()
        .with_gateway(Arc::clone(&gw))
        .priority(vec![])
        .build();
    assert!(empty.is_err());

    let dup = QuoteResolver::builder()
        .with_gateway(gw)
        .priority(vec![id("okx"), id("kraken"), id("okx")])
        .build();
    assert!(matches!(dup.err(), Some(CambioError::InvalidArg(m)) if m.contains("okx")));
}

#[test]
fn builder_rejects_zero_timeouts() {
    let (gw, _ctl) = DynamicGateway::new_with_controller(ALL);
    let res = QuoteResolver::builder()
        .with_gateway(gw)
        .provider_timeout(Duration::ZERO)
        .build();
    assert!(res.is_err());
}

#[test]
fn builder_overrides_are_applied() {
    let (gw, _ctl) = DynamicGateway::new_with_controller(ALL);
    let r = QuoteResolver::builder()
        .with_gateway(gw)
        .priority(vec![id("okx"), id("kraken")])
        .fallback(false)
        .cache_ttl(Duration::from_secs(5))
        .request_timeout(None)
        .build()
        .unwrap();
    let cfg: &ResolverConfig = r.config();
    assert_eq!(cfg.priority, vec![id("okx"), id("kraken")]);
    assert!(!cfg.fallback_enabled);
    assert_eq!(cfg.cache_ttl, Duration::from_secs(5));
    assert_eq!(cfg.request_timeout, None);
    assert_eq!(r.normalize_hint(None), id("okx"));
    assert_eq!(r.normalize_hint(Some(&id("binance"))), id("okx"));
    assert_eq!(r.normalize_hint(Some(&id("kraken"))), id("kraken"));
}

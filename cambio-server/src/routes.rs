use axum::extract::{Path, Query, State};
use axum::http::{HeaderValue, header};
use axum::routing::get;
use axum::{Json, Router};
use cambio::{QueryParams, QuoteRequest};
use serde_json::{Value, json};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::error::{ApiError, now_ms};
use crate::state::AppState;

/// Build the HTTP router.
///
/// Every response, errors included, carries permissive CORS headers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/crypto",
            get(crypto).post(crypto).options(preflight),
        )
        .route(
            "/api/forex",
            get(forex_root).post(forex_root).options(preflight),
        )
        .route(
            "/api/forex/",
            get(forex_root).post(forex_root).options(preflight),
        )
        .route(
            "/api/forex/*path",
            get(forex).post(forex).options(preflight),
        )
        .route("/health", get(health))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn preflight() -> Json<Value> {
    Json(json!({ "message": "CORS preflight ok" }))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "cache_entries": state.cache.entry_count().await,
        "timestamp": now_ms(),
    }))
}

async fn crypto(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Value>, ApiError> {
    let param = |name: &str| params.get(name).map(String::as_str);
    let req = QuoteRequest::from_params(
        param("exchange"),
        param("symbol"),
        param("timeframe"),
        param("limit"),
    )
    .map_err(ApiError::Crypto)?;

    let res = state.resolver.resolve(&req).await.map_err(ApiError::Crypto)?;
    Ok(Json(json!({
        "success": true,
        "data": res.data,
        "exchange": res.used_exchange,
        "original_exchange": res.original_exchange,
        "cached": res.from_cache,
        "timestamp": now_ms(),
    })))
}

async fn forex_root(
    state: State<AppState>,
    query: Query<QueryParams>,
) -> Result<Json<Value>, ApiError> {
    relay(state, String::new(), query).await
}

async fn forex(
    state: State<AppState>,
    Path(path): Path<String>,
    query: Query<QueryParams>,
) -> Result<Json<Value>, ApiError> {
    relay(state, path, query).await
}

async fn relay(
    State(state): State<AppState>,
    path: String,
    Query(query): Query<QueryParams>,
) -> Result<Json<Value>, ApiError> {
    let res = state.forex.relay(&path, &query).await.map_err(ApiError::Forex)?;
    Ok(Json(json!({
        "success": true,
        "data": res.data,
        "cached": res.from_cache,
        "timestamp": now_ms(),
    })))
}

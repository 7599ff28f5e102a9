use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cambio::CambioError;
use serde_json::{Map, Value, json};
use thiserror::Error;

/// Failures while bringing the server up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    #[error(transparent)]
    Cambio(#[from] CambioError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A request failure rendered as one of the JSON error envelopes.
#[derive(Debug)]
pub enum ApiError {
    /// Failure on the crypto endpoint.
    Crypto(CambioError),
    /// Failure on the forex relay.
    Forex(CambioError),
}

pub(crate) fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn client_message(err: &CambioError) -> String {
    match err {
        CambioError::InvalidArg(msg) => msg.clone(),
        other => other.to_string(),
    }
}

impl ApiError {
    fn crypto_parts(err: &CambioError) -> (StatusCode, Value) {
        match err {
            CambioError::InvalidArg(_) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "error": client_message(err), "timestamp": now_ms() }),
            ),
            CambioError::UnsupportedExchange { supported, .. } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "success": false,
                    "error": err.to_string(),
                    "supported": supported,
                    "timestamp": now_ms(),
                }),
            ),
            CambioError::AllExchangesFailed { ledger } => {
                let details: Map<String, Value> = ledger
                    .iter()
                    .map(|a| (a.exchange.as_str().to_string(), Value::from(a.error.clone())))
                    .collect();
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    json!({
                        "success": false,
                        "error": "all exchange connections failed",
                        "details": details,
                        "attempted_exchanges": ledger.attempted(),
                        "timestamp": now_ms(),
                    }),
                )
            }
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "success": false, "error": other.to_string(), "timestamp": now_ms() }),
            ),
        }
    }

    fn forex_parts(err: &CambioError) -> (StatusCode, Value) {
        let (status, msg, details) = match err {
            CambioError::Upstream {
                msg, status, body, ..
            } => (
                status
                    .and_then(|s| StatusCode::from_u16(s).ok())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                msg.clone(),
                body.clone().unwrap_or(Value::Null),
            ),
            CambioError::InvalidArg(_) => (StatusCode::BAD_REQUEST, client_message(err), Value::Null),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string(), Value::Null),
        };
        (
            status,
            json!({ "success": false, "error": msg, "details": details, "timestamp": now_ms() }),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Crypto(e) => Self::crypto_parts(e),
            Self::Forex(e) => Self::forex_parts(e),
        };
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), error = ?self, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = ?self, "request rejected");
        }
        (status, Json(body)).into_response()
    }
}

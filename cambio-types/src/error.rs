use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AttemptLedger, ExchangeId};

/// Unified error type for the cambio workspace.
///
/// This wraps argument validation errors, unsupported exchanges, upstream
/// failures tagged with their origin, and the aggregate produced when every
/// exchange in a fallback chain failed.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq)]
#[non_exhaustive]
pub enum CambioError {
    /// Invalid or missing input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// The requested exchange is not served by the gateway.
    #[error("unsupported exchange: {exchange}")]
    UnsupportedExchange {
        /// Exchange identifier as requested (after normalization).
        exchange: String,
        /// Exchanges the caller may use instead, in priority order.
        supported: Vec<ExchangeId>,
    },

    /// A single upstream call failed (network, HTTP status, API-level rejection).
    #[error("{origin} failed: {msg}")]
    Upstream {
        /// Exchange or upstream host that failed.
        origin: String,
        /// Human-readable error message.
        msg: String,
        /// HTTP status returned by the upstream, when a response was received.
        status: Option<u16>,
        /// Upstream response body, when a response was received.
        body: Option<serde_json::Value>,
    },

    /// Issues with the returned data (empty series, missing fields, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// An individual upstream call exceeded its timeout.
    #[error("provider timed out: {capability} via {connector}")]
    ProviderTimeout {
        /// Exchange or upstream name that timed out.
        connector: String,
        /// Capability label (e.g. "ticker", "ohlcv", "forex").
        capability: String,
    },

    /// Every exchange attempted for a request failed; the ledger records why.
    #[error("all exchanges failed ({} attempted)", ledger.len())]
    AllExchangesFailed {
        /// Per-exchange failure messages in attempt order.
        ledger: AttemptLedger,
    },

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl CambioError {
    /// Helper: build an `Upstream` error for a failure without an HTTP response.
    pub fn upstream(origin: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Upstream {
            origin: origin.into(),
            msg: msg.into(),
            status: None,
            body: None,
        }
    }

    /// Helper: build an `Upstream` error carrying the upstream HTTP status and body.
    pub fn upstream_status(
        origin: impl Into<String>,
        status: u16,
        body: Option<serde_json::Value>,
    ) -> Self {
        Self::Upstream {
            origin: origin.into(),
            msg: format!("request failed with status code {status}"),
            status: Some(status),
            body,
        }
    }

    /// Helper: build a `ProviderTimeout` error.
    pub fn provider_timeout(connector: impl Into<String>, capability: impl Into<String>) -> Self {
        Self::ProviderTimeout {
            connector: connector.into(),
            capability: capability.into(),
        }
    }

    /// Returns true for failures caused by the caller's input.
    ///
    /// These are never retried against another exchange.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidArg(_) | Self::UnsupportedExchange { .. })
    }

    /// Message suitable for an attempt ledger entry.
    ///
    /// Upstream errors report their bare message since the ledger is already
    /// keyed by exchange.
    #[must_use]
    pub fn ledger_message(&self) -> String {
        match self {
            Self::Upstream { msg, .. } => msg.clone(),
            Self::ProviderTimeout { capability, .. } => format!("{capability} request timed out"),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for CambioError {
    fn from(e: serde_json::Error) -> Self {
        Self::Data(e.to_string())
    }
}

//! cambio-server
//!
//! HTTP front end for the cambio resolver and forex relay.
//!
//! - `GET|POST /api/crypto?exchange=&symbol=&timeframe=&limit=`
//! - `GET|POST /api/forex/{path}` relayed to the forex upstream
//! - `GET /health`
//!
//! `OPTIONS` on either API route answers the CORS preflight.

pub mod config;
pub mod error;
mod routes;
mod state;

pub use crate::config::ServerConfig;
pub use crate::error::{ApiError, StartupError};
pub use crate::routes::app;
pub use crate::state::AppState;

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,cambio=debug,cambio_rest=debug";

/// Install a `fmt` subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

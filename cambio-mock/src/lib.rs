//! Test doubles for the cambio seams.
//!
//! [`DynamicGateway`] and [`DynamicForex`] defer every call to behaviors a
//! test installs through their controllers, and log each call so tests can
//! assert which upstreams were hit.

mod dynamic;
pub mod fixtures;
mod forex;

use std::time::Duration;

use cambio_core::CambioError;

pub use dynamic::{DynamicGateway, GatewayCall, GatewayController};
pub use forex::{DynamicForex, ForexController};

/// Instruction for how a call should behave.
#[derive(Clone, Debug)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Return the provided value after a delay.
    Slow(Duration, T),
    /// Fail immediately with the provided error.
    Fail(CambioError),
    /// Hang indefinitely (simulate a timeout).
    Hang,
}

impl<T> MockBehavior<T> {
    pub(crate) async fn run(self) -> Result<T, CambioError> {
        match self {
            Self::Return(v) => Ok(v),
            Self::Slow(delay, v) => {
                tokio::time::sleep(delay).await;
                Ok(v)
            }
            Self::Fail(e) => Err(e),
            Self::Hang => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }

    /// Shorthand for an upstream failure attributed to `origin`.
    pub fn fail(origin: &str, msg: &str) -> Self {
        Self::Fail(CambioError::upstream(origin, msg))
    }
}

//! Per-request record of failed exchange attempts.

use serde::{Deserialize, Serialize};

use crate::ExchangeId;

/// One failed attempt against an exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    /// Exchange that was tried.
    pub exchange: ExchangeId,
    /// Why the attempt did not produce a usable result.
    pub error: String,
}

/// Failures accumulated while walking a fallback chain, in attempt order.
///
/// Each exchange appears at most once: the resolver never re-attempts an
/// exchange within the same request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttemptLedger {
    attempts: Vec<Attempt>,
}

impl AttemptLedger {
    /// Create an empty ledger.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            attempts: Vec::new(),
        }
    }

    /// Record a failure for `exchange`, replacing an earlier entry for the same exchange.
    pub fn record(&mut self, exchange: ExchangeId, error: impl Into<String>) {
        let error = error.into();
        if let Some(existing) = self.attempts.iter_mut().find(|a| a.exchange == exchange) {
            existing.error = error;
        } else {
            self.attempts.push(Attempt { exchange, error });
        }
    }

    /// Returns true if `exchange` already has an entry.
    #[must_use]
    pub fn contains(&self, exchange: &ExchangeId) -> bool {
        self.attempts.iter().any(|a| &a.exchange == exchange)
    }

    /// Error recorded for `exchange`, if any.
    #[must_use]
    pub fn get(&self, exchange: &ExchangeId) -> Option<&str> {
        self.attempts
            .iter()
            .find(|a| &a.exchange == exchange)
            .map(|a| a.error.as_str())
    }

    /// Exchanges attempted, in order.
    #[must_use]
    pub fn attempted(&self) -> Vec<ExchangeId> {
        self.attempts.iter().map(|a| a.exchange.clone()).collect()
    }

    /// Iterate over recorded attempts in order.
    pub fn iter(&self) -> impl Iterator<Item = &Attempt> {
        self.attempts.iter()
    }

    /// Number of recorded failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }
}

impl<'a> IntoIterator for &'a AttemptLedger {
    type Item = &'a Attempt;
    type IntoIter = std::slice::Iter<'a, Attempt>;

    fn into_iter(self) -> Self::IntoIter {
        self.attempts.iter()
    }
}

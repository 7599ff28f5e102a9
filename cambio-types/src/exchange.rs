//! Exchange identifiers usable across crates.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::CambioError;

/// Identifier of a crypto exchange, e.g. `okx` or `kraken`.
///
/// Identifiers are lowercase ASCII. Parsing trims surrounding whitespace and
/// lowercases the input so that `" OKX "` and `"okx"` address the same venue
/// and produce the same cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExchangeId(String);

impl ExchangeId {
    /// Parse and normalize a user-supplied exchange identifier.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the input is empty after trimming or contains
    /// characters other than ASCII letters, digits, `-`, `_` or `.`.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, CambioError> {
        let id = raw.as_ref().trim().to_ascii_lowercase();
        if id.is_empty() {
            return Err(CambioError::InvalidArg(
                "exchange identifier must not be empty".to_string(),
            ));
        }
        if let Some(bad) = id
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return Err(CambioError::InvalidArg(format!(
                "invalid character {bad:?} in exchange identifier {id:?}"
            )));
        }
        Ok(Self(id))
    }

    /// Build an identifier from a compile-time constant.
    ///
    /// The constant must already be in normalized (lowercase) form.
    #[must_use]
    pub fn from_static(id: &'static str) -> Self {
        debug_assert!(
            !id.is_empty() && id == id.to_ascii_lowercase(),
            "static exchange id must be lowercase and non-empty"
        );
        Self(id.to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ExchangeId {
    type Error = CambioError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ExchangeId> for String {
    fn from(id: ExchangeId) -> Self {
        id.0
    }
}

impl AsRef<str> for ExchangeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

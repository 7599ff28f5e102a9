//! Layered server configuration.
//!
//! Values are read from built-in defaults, then an optional TOML file, then
//! `CAMBIO_`-prefixed environment variables with `__` separating sections
//! (for example `CAMBIO_RESOLVER__CACHE_TTL_SECS=10`).

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use cambio::{CambioError, ExchangeId, ForexConfig, ResolverConfig};
use cambio_core::CacheConfig;
use ::config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::error::StartupError;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "CAMBIO_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "cambio.toml";

/// Root of the server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ListenSection,
    pub resolver: ResolverSection,
    pub forex: ForexSection,
    pub cache: CacheSection,
    /// Per-exchange base URL overrides, keyed by exchange id.
    pub exchanges: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListenSection {
    pub bind: String,
    /// Timeout applied by the shared exchange HTTP client.
    pub http_timeout_secs: u64,
}

impl Default for ListenSection {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8888".to_string(),
            http_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverSection {
    pub fallback: bool,
    pub priority: Vec<String>,
    pub hints_mapped_to_default: Vec<String>,
    pub cache_ttl_secs: u64,
    pub provider_timeout_secs: u64,
    /// Zero disables the whole-request deadline.
    pub request_timeout_secs: u64,
}

impl Default for ResolverSection {
    fn default() -> Self {
        let d = ResolverConfig::default();
        Self {
            fallback: d.fallback_enabled,
            priority: d.priority.iter().map(|e| e.as_str().to_string()).collect(),
            hints_mapped_to_default: d
                .hints_mapped_to_default
                .iter()
                .map(|e| e.as_str().to_string())
                .collect(),
            cache_ttl_secs: d.cache_ttl.as_secs(),
            provider_timeout_secs: d.provider_timeout.as_secs(),
            request_timeout_secs: d.request_timeout.map_or(0, |t| t.as_secs()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForexSection {
    pub base_url: String,
    pub cache_ttl_secs: u64,
    pub timeout_secs: u64,
}

impl Default for ForexSection {
    fn default() -> Self {
        let d = ForexConfig::default();
        Self {
            base_url: d.base_url,
            cache_ttl_secs: d.cache_ttl.as_secs(),
            timeout_secs: d.timeout.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    pub max_entries: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            max_entries: CacheConfig::default().max_entries,
        }
    }
}

impl ServerConfig {
    /// Load from the file named by `CAMBIO_CONFIG` (default `cambio.toml`)
    /// and the process environment.
    ///
    /// The default file may be absent; an explicitly named one must exist.
    ///
    /// # Errors
    /// Returns `StartupError::Config` when a source cannot be read or a value
    /// has the wrong type.
    pub fn load() -> Result<Self, StartupError> {
        let (path, required) = match std::env::var(CONFIG_PATH_ENV) {
            Ok(p) if !p.trim().is_empty() => (p, true),
            _ => (DEFAULT_CONFIG_PATH.to_string(), false),
        };
        let config = Config::builder()
            .add_source(File::with_name(&path).required(required))
            .add_source(env_source())
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Load from an in-memory TOML document and an explicit environment map.
    ///
    /// # Errors
    /// Same as [`ServerConfig::load`].
    pub fn from_sources(
        toml: &str,
        env: BTreeMap<String, String>,
    ) -> Result<Self, StartupError> {
        let config = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .add_source(env_source().source(Some(env.into_iter().collect())))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Resolver settings as consumed by [`cambio::QuoteResolver`].
    ///
    /// # Errors
    /// Returns `InvalidArg` for a malformed exchange id.
    pub fn resolver_config(&self) -> Result<ResolverConfig, CambioError> {
        let r = &self.resolver;
        let priority = r
            .priority
            .iter()
            .map(ExchangeId::new)
            .collect::<Result<Vec<_>, _>>()?;
        let hints = r
            .hints_mapped_to_default
            .iter()
            .map(ExchangeId::new)
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(ResolverConfig {
            fallback_enabled: r.fallback,
            priority,
            hints_mapped_to_default: hints,
            cache_ttl: Duration::from_secs(r.cache_ttl_secs),
            provider_timeout: Duration::from_secs(r.provider_timeout_secs),
            request_timeout: (r.request_timeout_secs > 0)
                .then(|| Duration::from_secs(r.request_timeout_secs)),
        })
    }

    #[must_use]
    pub fn forex_config(&self) -> ForexConfig {
        ForexConfig {
            base_url: self.forex.base_url.clone(),
            cache_ttl: Duration::from_secs(self.forex.cache_ttl_secs),
            timeout: Duration::from_secs(self.forex.timeout_secs),
        }
    }

    #[must_use]
    pub const fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            max_entries: self.cache.max_entries,
        }
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("CAMBIO")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("resolver.priority")
        .with_list_parse_key("resolver.hints_mapped_to_default")
}

//! cambio-rest
//!
//! REST implementation of the cambio seams. [`RestGateway`] serves every
//! built-in [`venues::Venue`] through one shared `reqwest::Client`;
//! [`HttpForexUpstream`] relays forex calls to a single upstream host.
#![warn(missing_docs)]

/// HTTP forex upstream.
pub mod forex;
/// Per-exchange endpoint and payload definitions.
pub mod venues;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cambio_core::{CambioError, Candle, ExchangeGateway, ExchangeId, Ticker};
use serde_json::Value;
use url::Url;

pub use forex::HttpForexUpstream;
use venues::{Endpoint, Venue};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("cambio/", env!("CARGO_PKG_VERSION"));

struct Route {
    venue: Arc<dyn Venue>,
    base: Url,
}

/// Exchange gateway over the venues' public REST APIs.
pub struct RestGateway {
    http: reqwest::Client,
    routes: BTreeMap<ExchangeId, Route>,
}

impl RestGateway {
    /// Gateway for every built-in venue at its production URL.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new() -> Result<Self, CambioError> {
        Self::builder().build()
    }

    /// Start configuring a gateway.
    #[must_use]
    pub fn builder() -> RestGatewayBuilder {
        RestGatewayBuilder::default()
    }

    fn route(&self, exchange: &ExchangeId) -> Result<&Route, CambioError> {
        self.routes
            .get(exchange)
            .ok_or_else(|| CambioError::UnsupportedExchange {
                exchange: exchange.to_string(),
                supported: self.supported(),
            })
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "cambio::rest",
            skip(self, route, endpoint),
            fields(venue = route.venue.id(), path = endpoint.path),
        )
    )]
    async fn get_json(&self, route: &Route, endpoint: Endpoint) -> Result<Value, CambioError> {
        let venue = route.venue.id();
        let url = endpoint_url(&route.base, &endpoint);
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| CambioError::upstream(venue, e.to_string()))?;
        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| CambioError::upstream(venue, e.to_string()))?;

        if !status.is_success() {
            let body = decode_lenient(&bytes);
            return Err(match route.venue.api_error(&body) {
                Some(msg) => CambioError::Upstream {
                    origin: venue.to_string(),
                    msg,
                    status: Some(status.as_u16()),
                    body: Some(body),
                },
                None => CambioError::upstream_status(venue, status.as_u16(), Some(body)),
            });
        }

        let body: Value = serde_json::from_slice(&bytes)?;
        if let Some(msg) = route.venue.api_error(&body) {
            return Err(CambioError::upstream(venue, msg));
        }
        Ok(body)
    }
}

/// JSON when the bytes parse as JSON, otherwise the text itself.
pub(crate) fn decode_lenient(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

fn endpoint_url(base: &Url, endpoint: &Endpoint) -> Url {
    let mut url = base.clone();
    let prefix = base.path().trim_end_matches('/');
    url.set_path(&format!("{prefix}{}", endpoint.path));
    if !endpoint.query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(endpoint.query.iter().map(|(k, v)| (*k, v.as_str())));
    }
    url
}

#[async_trait]
impl ExchangeGateway for RestGateway {
    fn name(&self) -> &'static str {
        "cambio-rest"
    }

    fn supported(&self) -> Vec<ExchangeId> {
        self.routes.keys().cloned().collect()
    }

    fn supports(&self, exchange: &ExchangeId) -> bool {
        self.routes.contains_key(exchange)
    }

    async fn fetch_ticker(
        &self,
        exchange: &ExchangeId,
        symbol: &str,
    ) -> Result<Ticker, CambioError> {
        let route = self.route(exchange)?;
        let market = route.venue.market(symbol)?;
        let body = self.get_json(route, route.venue.ticker(&market)).await?;
        route.venue.parse_ticker(symbol, &body)
    }

    async fn fetch_ohlcv(
        &self,
        exchange: &ExchangeId,
        symbol: &str,
        timeframe: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Candle>, CambioError> {
        let route = self.route(exchange)?;
        let venue = route.venue.id();
        let interval = route.venue.interval(timeframe).ok_or_else(|| {
            CambioError::upstream(venue, format!("{venue} does not support timeframe {timeframe}"))
        })?;
        let market = route.venue.market(symbol)?;
        let body = self
            .get_json(route, route.venue.ohlcv(&market, interval, limit))
            .await?;
        let candles = route.venue.parse_ohlcv(&body)?;
        Ok(venues::finish_series(candles, limit))
    }
}

/// Builder for [`RestGateway`].
pub struct RestGatewayBuilder {
    http: Option<reqwest::Client>,
    timeout: Duration,
    venues: Vec<Arc<dyn Venue>>,
    base_urls: BTreeMap<String, String>,
}

impl Default for RestGatewayBuilder {
    fn default() -> Self {
        Self {
            http: None,
            timeout: DEFAULT_TIMEOUT,
            venues: venues::builtin(),
            base_urls: BTreeMap::new(),
        }
    }
}

impl RestGatewayBuilder {
    /// Use a preconfigured HTTP client. `timeout` is ignored when set.
    #[must_use]
    pub fn client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Connect/read timeout for the internally built client.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Point one exchange at a different base URL.
    #[must_use]
    pub fn base_url(mut self, exchange: &str, url: impl Into<String>) -> Self {
        self.base_urls
            .insert(exchange.trim().to_ascii_lowercase(), url.into());
        self
    }

    /// Build the gateway.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unparsable base URL or an override naming
    /// an unknown exchange, and `Other` if the HTTP client cannot be built.
    pub fn build(self) -> Result<RestGateway, CambioError> {
        let http = match self.http {
            Some(c) => c,
            None => reqwest::Client::builder()
                .timeout(self.timeout)
                .user_agent(USER_AGENT)
                .build()
                .map_err(|e| CambioError::Other(format!("http client: {e}")))?,
        };

        if let Some(unknown) = self
            .base_urls
            .keys()
            .find(|id| !self.venues.iter().any(|v| v.id() == id.as_str()))
        {
            return Err(CambioError::InvalidArg(format!(
                "base url override for unknown exchange {unknown:?}"
            )));
        }

        let mut routes = BTreeMap::new();
        for venue in self.venues {
            let raw = self
                .base_urls
                .get(venue.id())
                .map_or(venue.default_base_url(), String::as_str);
            let base = Url::parse(raw).map_err(|e| {
                CambioError::InvalidArg(format!("invalid base url {raw:?} for {}: {e}", venue.id()))
            })?;
            routes.insert(ExchangeId::new(venue.id())?, Route { venue, base });
        }
        Ok(RestGateway { http, routes })
    }
}

use async_trait::async_trait;
use cambio_core::{CambioError, ForexConfig, ForexUpstream, QueryParams};
use serde_json::Value;
use url::Url;

use crate::{USER_AGENT, decode_lenient};

const NAME: &str = "fxcm";

/// Forwards forex calls to one upstream host, path and query verbatim.
pub struct HttpForexUpstream {
    http: reqwest::Client,
    base: Url,
}

impl HttpForexUpstream {
    /// Build from configuration with a dedicated HTTP client.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unparsable base URL and `Other` if the
    /// HTTP client cannot be built.
    pub fn new(cfg: &ForexConfig) -> Result<Self, CambioError> {
        let http = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CambioError::Other(format!("http client: {e}")))?;
        Self::with_client(http, &cfg.base_url)
    }

    /// Build around an existing client.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unparsable base URL.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, CambioError> {
        let base = Url::parse(base_url)
            .map_err(|e| CambioError::InvalidArg(format!("invalid forex base url {base_url:?}: {e}")))?;
        Ok(Self { http, base })
    }

    fn url(&self, path: &str, query: &QueryParams) -> Url {
        let mut url = self.base.clone();
        let prefix = self.base.path().trim_end_matches('/');
        url.set_path(&format!("{prefix}/{}", path.trim_start_matches('/')));
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        url
    }
}

#[async_trait]
impl ForexUpstream for HttpForexUpstream {
    fn name(&self) -> &'static str {
        NAME
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(target = "cambio::rest", skip(self, query), fields(params = query.len()))
    )]
    async fn fetch(&self, path: &str, query: &QueryParams) -> Result<Value, CambioError> {
        let resp = self
            .http
            .get(self.url(path, query))
            .send()
            .await
            .map_err(|e| CambioError::upstream(NAME, e.to_string()))?;
        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| CambioError::upstream(NAME, e.to_string()))?;
        let body = decode_lenient(&bytes);
        if !status.is_success() {
            return Err(CambioError::upstream_status(NAME, status.as_u16(), Some(body)));
        }
        Ok(body)
    }
}

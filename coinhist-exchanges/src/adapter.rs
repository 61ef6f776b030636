#[cfg(test)]
use std::sync::Arc;

use async_trait::async_trait;
use coinhist_core::{CoinhistError, GatewayConfig};
use url::Url;

/// Status and body of one upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body, unread.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// A `200 OK` carrying `body`.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::with_status(200, body)
    }

    /// A response with an arbitrary status.
    pub fn with_status(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// True for 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Outbound GET abstraction (so connectors can be driven without a network in tests).
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue a GET to `url` on behalf of `exchange`.
    ///
    /// Only transport failures are errors; non-2xx statuses come back as a
    /// `RawResponse` so the connector can decode the exchange's error body.
    async fn get(&self, exchange: &str, url: Url) -> Result<RawResponse, CoinhistError>;
}

/// Production transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Wrap an existing client.
    #[must_use]
    pub const fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build a client honoring the configured user agent and timeout.
    ///
    /// # Errors
    /// `InvalidArg` if the TLS backend cannot be initialized.
    pub fn from_config(cfg: &GatewayConfig) -> Result<Self, CoinhistError> {
        let mut builder = reqwest::Client::builder().user_agent(cfg.user_agent.clone());
        if let Some(timeout) = cfg.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map(Self::new)
            .map_err(|e| CoinhistError::InvalidArg(format!("http client: {e}")))
    }
}

fn map_reqwest_err(exchange: &str, e: &reqwest::Error) -> CoinhistError {
    if e.is_timeout() {
        CoinhistError::upstream(exchange, "request timed out")
    } else if e.is_connect() {
        CoinhistError::upstream(exchange, format!("connection failed: {e}"))
    } else {
        CoinhistError::upstream(exchange, e.to_string())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, exchange: &str, url: Url) -> Result<RawResponse, CoinhistError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| map_reqwest_err(exchange, &e))?;
        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .await
            .map_err(|e| map_reqwest_err(exchange, &e))?;
        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
impl dyn HttpTransport {
    /// Test helper that answers every GET with a closure of the requested URL.
    pub fn from_fn<F>(f: F) -> Arc<dyn HttpTransport>
    where
        F: Send + Sync + 'static + Fn(&Url) -> Result<RawResponse, CoinhistError>,
    {
        struct FnTransport<F>(F);

        #[async_trait]
        impl<F> HttpTransport for FnTransport<F>
        where
            F: Send + Sync + 'static + Fn(&Url) -> Result<RawResponse, CoinhistError>,
        {
            async fn get(&self, _exchange: &str, url: Url) -> Result<RawResponse, CoinhistError> {
                (self.0)(&url)
            }
        }

        Arc::new(FnTransport(f))
    }
}

/// Check a configured base URL and strip any trailing slash.
pub(crate) fn validate_base(exchange: &str, base: &str) -> Result<String, CoinhistError> {
    Url::parse(base)
        .map_err(|e| CoinhistError::InvalidArg(format!("{exchange} base url {base:?}: {e}")))?;
    Ok(base.trim_end_matches('/').to_string())
}

/// `{base}/{path}?{query}`.
pub(crate) fn endpoint(
    exchange: &str,
    base: &str,
    path: &str,
    query: &[(&str, String)],
) -> Result<Url, CoinhistError> {
    let raw = format!("{base}/{}", path.trim_start_matches('/'));
    Url::parse_with_params(&raw, query)
        .map_err(|e| CoinhistError::InvalidArg(format!("{exchange} url {raw}: {e}")))
}

/// GET `url` and return the body of a 2xx response.
///
/// For any other status the body goes through `error_message`; when that
/// yields nothing the status code itself becomes the message.
pub(crate) async fn fetch_ok(
    transport: &dyn HttpTransport,
    exchange: &str,
    url: Url,
    error_message: fn(&[u8]) -> Option<String>,
) -> Result<Vec<u8>, CoinhistError> {
    #[cfg(feature = "tracing")]
    tracing::debug!(exchange, url = %url, "querying upstream");

    let resp = transport.get(exchange, url).await?;
    if resp.is_success() {
        return Ok(resp.body);
    }
    let msg = error_message(&resp.body).unwrap_or_else(|| format!("status {}", resp.status));

    #[cfg(feature = "tracing")]
    tracing::warn!(exchange, status = resp.status, error = %msg, "upstream rejected request");

    Err(CoinhistError::upstream(exchange, msg))
}

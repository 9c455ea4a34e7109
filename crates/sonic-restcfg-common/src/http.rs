//! HTTP transport for the device REST interface, built on `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::client::RestClient;
use crate::error::{RestCfgError, RestCfgResult};
use crate::request::{Method, Request};

/// Media type used by the SONiC management framework.
pub const YANG_JSON: &str = "application/yang-data+json";

/// Transport settings for [`HttpRestClient`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Device host name or address.
    pub host: String,
    /// HTTPS port.
    pub port: u16,
    /// Basic-auth user.
    pub username: String,
    /// Basic-auth password.
    pub password: String,
    /// Verify the device certificate.
    pub tls_verify: bool,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 443,
            username: "admin".to_string(),
            password: String::new(),
            tls_verify: false,
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Returns the RESTCONF root URL, with a trailing slash.
    pub fn base_url(&self) -> String {
        format!("https://{}:{}/restconf/", self.host, self.port)
    }
}

/// [`RestClient`] talking HTTPS to a SONiC device.
#[derive(Debug, Clone)]
pub struct HttpRestClient {
    client: reqwest::Client,
    config: TransportConfig,
}

impl HttpRestClient {
    /// Builds a client from transport settings.
    pub fn new(config: TransportConfig) -> RestCfgResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("sonic-restcfg/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(!config.tls_verify)
            .build()
            .map_err(|e| RestCfgError::internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn url(&self, request: &Request) -> String {
        format!("{}{}", self.config.base_url(), request.path)
    }
}

#[async_trait]
impl RestClient for HttpRestClient {
    #[instrument(skip(self), fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: &Request) -> RestCfgResult<Option<Value>> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self
            .client
            .request(method, self.url(request))
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header(reqwest::header::ACCEPT, YANG_JSON);

        if let Some(ref data) = request.data {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, YANG_JSON)
                .body(data.to_string());
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(RestCfgError::connection(status.as_u16(), body));
        }

        debug!(status = status.as_u16(), bytes = body.len(), "Request succeeded");

        if body.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| RestCfgError::schema(&request.path, e.to_string()))
    }
}

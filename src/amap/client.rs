//! AMap REST client.
//!
//! A thin wrapper over a pooled [`reqwest::Client`] that signs requests with
//! the API key, retries transient failures and decodes the JSON body.

use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::config::ClientConfig;
use super::error::{AmapError, AmapResult};
use super::types::{GeoResult, NearbyQuery, PoiResult};

/// Longest upstream error body kept in an [`AmapError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Client for the AMap IP-location and nearby-search endpoints.
///
/// Cheap to share behind an `Arc`: the inner connection pool is safe for
/// concurrent use, and every pooled connection is closed when the client is
/// dropped.
#[derive(Debug)]
pub struct AmapClient {
    http: reqwest::Client,
    config: ClientConfig,
    ip_url: Url,
    around_url: Url,
}

impl AmapClient {
    /// Path of the IP geolocation endpoint.
    pub const IP_PATH: &'static str = "/v3/ip";

    /// Path of the nearby (around) search endpoint.
    pub const AROUND_PATH: &'static str = "/v5/place/around";

    /// Create a client, validating the configuration first.
    pub fn new(config: ClientConfig) -> AmapResult<Self> {
        let base = config.validate()?;

        let mut builder = reqwest::Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| AmapError::invalid_config(format!("failed to build HTTP client: {}", e)))?;

        let ip_url = endpoint(&base, Self::IP_PATH)?;
        let around_url = endpoint(&base, Self::AROUND_PATH)?;

        info!(
            base_url = %base,
            attempts = config.attempts(),
            timeout = ?config.timeout,
            "AMap client initialized"
        );

        Ok(Self {
            http,
            config,
            ip_url,
            around_url,
        })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Locate an IP address. With `None`, upstream locates the caller.
    #[instrument(skip(self))]
    pub async fn locate_ip(&self, ip: Option<&str>) -> AmapResult<GeoResult> {
        let mut params = Vec::new();
        if let Some(ip) = ip.map(str::trim).filter(|ip| !ip.is_empty()) {
            params.push(("ip", ip.to_string()));
        }

        let result: GeoResult = self.get_json(&self.ip_url, &params).await?;
        info!(
            status = %result.status,
            province = ?result.province(),
            city = ?result.city(),
            "IP lookup finished"
        );
        Ok(result)
    }

    /// Search points of interest around a location.
    ///
    /// The query is validated before any request is sent.
    #[instrument(skip(self), fields(location = %query.location))]
    pub async fn search_nearby(&self, query: &NearbyQuery) -> AmapResult<PoiResult> {
        query.validate()?;

        let result: PoiResult = self.get_json(&self.around_url, &query.query_pairs()).await?;
        info!(
            status = %result.status,
            count = result.pois.len(),
            "Nearby search finished"
        );
        Ok(result)
    }

    /// GET `url` with retry on transient failures.
    async fn get_json<T>(&self, url: &Url, params: &[(&str, String)]) -> AmapResult<T>
    where
        T: DeserializeOwned,
    {
        let attempts = self.config.attempts();
        let mut attempt = 1;

        loop {
            match self.get_once(url, params).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < attempts => {
                    warn!(attempt, attempts, error = %e, "Transient AMap failure, retrying");
                    if !self.config.retry_delay.is_zero() {
                        tokio::time::sleep(self.config.retry_delay).await;
                    }
                    attempt += 1;
                }
                Err(e) => {
                    warn!(attempt, attempts, error = %e, "AMap request failed");
                    return Err(e);
                }
            }
        }
    }

    async fn get_once<T>(&self, url: &Url, params: &[(&str, String)]) -> AmapResult<T>
    where
        T: DeserializeOwned,
    {
        debug!(%url, "Sending AMap request");

        let response = self
            .http
            .get(url.clone())
            .query(&[("key", self.config.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AmapError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        debug!(%status, bytes = body.len(), "AMap response received");
        Ok(serde_json::from_str(&body)?)
    }
}

/// Append an endpoint path to the base URL, keeping any path prefix.
fn endpoint(base: &Url, path: &str) -> AmapResult<Url> {
    let joined = format!("{}{}", base.as_str().trim_end_matches('/'), path);
    Url::parse(&joined)
        .map_err(|e| AmapError::invalid_config(format!("invalid endpoint '{}': {}", joined, e)))
}

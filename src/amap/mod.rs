//! AMap (Gaode Maps) REST client.
//!
//! This is the only component that talks to the outside world. It wraps
//! two endpoints:
//!
//! - `GET /v3/ip`: IP geolocation ([`AmapClient::locate_ip`])
//! - `GET /v5/place/around`: nearby POI search ([`AmapClient::search_nearby`])
//!
//! The client returns typed results or an [`AmapError`]; turning those into
//! tool responses is left to `domains::tools`.

mod client;
mod config;
mod error;
mod types;

#[cfg(test)]
pub(crate) mod stub;

pub use client::AmapClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY};
pub use error::{AmapError, AmapResult};
pub use types::{
    DEFAULT_PAGE_NUM, DEFAULT_PAGE_SIZE, DEFAULT_RADIUS, GeoResult, MAX_PAGE_SIZE, MAX_RADIUS,
    NearbyQuery, Poi, PoiResult, STATUS_OK,
};

//! Nominatim (OpenStreetMap) geocoding client.

use std::future::Future;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use tracing::debug;

use crate::geo::Coord;

use super::error::GeocodeError;

/// Default base URL for the public Nominatim instance.
const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Nominatim's usage policy requires an identifying user agent.
const DEFAULT_USER_AGENT: &str = "bluebikes_dashboard";

/// A location found by a geocoding provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub coord: Coord,
    pub formatted_address: String,
}

/// A provider that turns one free-text query into at most one location.
pub trait Geocoder {
    /// Look up a query.
    ///
    /// Returns `Ok(None)` when the provider answered but found nothing.
    fn lookup(&self, query: &str)
    -> impl Future<Output = Result<Option<Place>, GeocodeError>> + Send;
}

/// One search hit in Nominatim's `jsonv2` format.
///
/// Nominatim encodes coordinates as strings.
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    display_name: String,
}

impl SearchHit {
    fn into_place(self) -> Result<Place, GeocodeError> {
        let parse = |field: &str, value: &str| {
            value.parse::<f64>().map_err(|_| GeocodeError::Json {
                message: format!("invalid {field}: {value}"),
            })
        };
        Ok(Place {
            coord: Coord::new(parse("lat", &self.lat)?, parse("lon", &self.lon)?),
            formatted_address: self.display_name,
        })
    }
}

/// Configuration for the Nominatim client.
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    /// Base URL for the API
    pub base_url: String,
    /// User agent sent with every request
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl NominatimConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (for testing or a self-hosted instance).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for Nominatim's `/search` endpoint.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self, GeocodeError> {
        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(&config.user_agent).map_err(|_| GeocodeError::Api {
            status: 0,
            message: "Invalid user agent".to_string(),
        })?;
        headers.insert(USER_AGENT, agent);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl Geocoder for NominatimClient {
    async fn lookup(&self, query: &str) -> Result<Option<Place>, GeocodeError> {
        let url = format!("{}/search", self.base_url);
        debug!(query, "geocoding");

        let response = self
            .http
            .get(&url)
            .query(&[("q", query), ("format", "jsonv2"), ("limit", "1")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let hits: Vec<SearchHit> = serde_json::from_str(&body).map_err(|e| GeocodeError::Json {
            message: e.to_string(),
        })?;

        hits.into_iter().next().map(SearchHit::into_place).transpose()
    }
}

//! GBFS feed client.

use std::future::Future;

use chrono::Utc;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::error::InventoryError;
use super::station::{Inventory, join_feeds};
use super::types::{Discovery, StationFeed, StationInformationDto, StationStatusDto};

/// Default discovery URL (Bluebikes, Boston).
const DEFAULT_DISCOVERY_URL: &str = "http://gbfs.bluebikes.com/gbfs/gbfs.json";

/// Anything that can produce a fresh inventory snapshot.
pub trait InventorySource {
    fn fetch_inventory(&self) -> impl Future<Output = Result<Inventory, InventoryError>> + Send;
}

/// Configuration for the GBFS client.
#[derive(Debug, Clone)]
pub struct GbfsConfig {
    /// URL of the root discovery document
    pub discovery_url: String,
    /// Language section of the discovery document to read
    pub language: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GbfsConfig {
    pub fn new() -> Self {
        Self {
            discovery_url: DEFAULT_DISCOVERY_URL.to_string(),
            language: "en".to_string(),
            timeout_secs: 15,
        }
    }

    /// Point at another operator's discovery document.
    pub fn with_discovery_url(mut self, url: impl Into<String>) -> Self {
        self.discovery_url = url.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

impl Default for GbfsConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for a GBFS station system.
#[derive(Debug, Clone)]
pub struct GbfsClient {
    http: reqwest::Client,
    discovery_url: String,
    language: String,
}

impl GbfsClient {
    pub fn new(config: GbfsConfig) -> Result<Self, InventoryError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            discovery_url: config.discovery_url,
            language: config.language,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, InventoryError> {
        debug!(url, "fetching feed");
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(InventoryError::Api {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| InventoryError::Json {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    /// Resolve the station information and status feed URLs.
    async fn feed_urls(&self) -> Result<(String, String), InventoryError> {
        let discovery: Discovery = self.get_json(&self.discovery_url).await?;
        discovery.station_feed_urls(&self.language)
    }
}

impl InventorySource for GbfsClient {
    async fn fetch_inventory(&self) -> Result<Inventory, InventoryError> {
        let (info_url, status_url) = self.feed_urls().await?;

        let info: StationFeed<StationInformationDto> = self.get_json(&info_url).await?;
        let status: StationFeed<StationStatusDto> = self.get_json(&status_url).await?;

        let stations = join_feeds(info.data.stations, &status.data.stations);
        info!(count = stations.len(), "fetched station inventory");

        Ok(Inventory::new(stations, Utc::now()))
    }
}

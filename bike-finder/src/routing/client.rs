//! OSRM walking-route client.

use std::future::Future;

use serde::Deserialize;

use crate::geo::Coord;

use super::error::RoutingError;

/// Default base URL for the public OSRM demo server's foot profile.
const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org/route/v1/walking";

/// A provider of walking routes between two points.
///
/// This abstraction lets the resolver run against canned distances in tests.
pub trait RouteProvider {
    /// Length of the walking route in metres.
    ///
    /// Returns `Ok(None)` when the router answered but found no route.
    fn walking_route_meters(
        &self,
        from: Coord,
        to: Coord,
    ) -> impl Future<Output = Result<Option<f64>, RoutingError>> + Send;
}

/// OSRM `route` response, summary only.
#[derive(Debug, Deserialize)]
struct RouteResponse {
    code: String,
    #[serde(default)]
    routes: Vec<RouteSummary>,
}

#[derive(Debug, Deserialize)]
struct RouteSummary {
    /// Route length in metres
    distance: f64,
}

impl RouteResponse {
    fn distance_meters(&self) -> Option<f64> {
        if self.code != "Ok" {
            return None;
        }
        self.routes.first().map(|r| r.distance)
    }
}

/// Configuration for the OSRM client.
#[derive(Debug, Clone)]
pub struct OsrmConfig {
    /// Base URL up to and including the profile, e.g. `.../route/v1/walking`
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OsrmConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (for testing or a self-hosted router).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the OSRM `route` service.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    http: reqwest::Client,
    base_url: String,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, RoutingError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Route URL for a pair of points. OSRM takes `lon,lat` order.
    fn route_url(&self, from: Coord, to: Coord) -> String {
        format!(
            "{}/{},{};{},{}",
            self.base_url, from.lon, from.lat, to.lon, to.lat
        )
    }
}

impl RouteProvider for OsrmClient {
    async fn walking_route_meters(
        &self,
        from: Coord,
        to: Coord,
    ) -> Result<Option<f64>, RoutingError> {
        let response = self
            .http
            .get(self.route_url(from, to))
            .query(&[
                ("overview", "false"),
                ("geometries", "geojson"),
                ("steps", "false"),
                ("annotations", "false"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RoutingError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let route: RouteResponse = serde_json::from_str(&body).map_err(|e| RoutingError::Json {
            message: e.to_string(),
        })?;

        Ok(route.distance_meters())
    }
}

//! Data transfer objects for web requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geocode::GeocodeResult;
use crate::nearby::{AvailabilitySummary, CacheStatus, FilterSummary, NearbyStation, SearchKind};
use crate::settings::Favorite;
use crate::weather::{Conditions, Weather};

use super::map::MarkerStyle;

/// Request to geocode an address.
#[derive(Debug, Deserialize)]
pub struct GeocodeRequest {
    pub address: String,
}

/// Request for stations near an address or a point.
#[derive(Debug, Deserialize)]
pub struct NearbyRequest {
    /// Free-text address; ignored when `lat` and `lon` are given
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,

    /// Search radius in miles (defaults to 0.5)
    pub radius: Option<f64>,

    /// Compass direction name or "all"
    pub direction: Option<String>,

    /// "pickup" or "dropoff"
    pub kind: Option<String>,

    /// Bypass the result cache
    #[serde(default)]
    pub refresh: bool,
}

/// A station in nearby results.
#[derive(Debug, Serialize)]
pub struct StationResult {
    pub station_id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub capacity: Option<u32>,
    pub bikes: u32,
    pub ebikes: u32,
    pub regular_bikes: u32,
    pub docks: u32,
    pub is_renting: bool,
    pub is_returning: bool,
    pub straight_miles: f64,
    pub walking_miles: f64,
    pub label: String,
    pub marker: MarkerStyle,
}

impl StationResult {
    pub fn from_nearby(kind: SearchKind, nearby: &NearbyStation) -> Self {
        let s = &nearby.station;
        Self {
            station_id: s.station_id.clone(),
            name: s.name.clone(),
            lat: s.coord.lat,
            lon: s.coord.lon,
            capacity: s.capacity,
            bikes: s.bikes_available(),
            ebikes: s.ebikes_available(),
            regular_bikes: s.regular_bikes_available(),
            docks: s.docks_available(),
            is_renting: s.is_renting(),
            is_returning: s.is_returning(),
            straight_miles: nearby.straight_miles,
            walking_miles: nearby.walking_miles,
            label: nearby.label.clone(),
            marker: MarkerStyle::for_station(kind, s),
        }
    }
}

/// Response for a nearby search.
#[derive(Debug, Serialize)]
pub struct NearbyResponse {
    /// Where the search ran from
    pub origin: GeocodeResult,
    pub kind: SearchKind,
    pub radius: f64,
    /// Direction name, or "all"
    pub direction: String,

    /// Sorted by walking distance
    pub stations: Vec<StationResult>,
    pub availability: AvailabilitySummary,
    pub summary: FilterSummary,

    /// E.g. "2 blocked by barriers, 1 too far to walk"
    pub filtered_out: Option<String>,

    /// Set when nothing was found
    pub message: Option<String>,

    pub cache: CacheStatus,
    pub zoom: u8,
    pub inventory_updated: DateTime<Utc>,
}

/// Response after re-fetching the station inventory.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub stations: usize,
    pub updated_at: DateTime<Utc>,
}

/// Request for current weather.
#[derive(Debug, Deserialize)]
pub struct WeatherRequest {
    pub lat: f64,
    pub lon: f64,
}

/// Current weather with a riding-conditions rating.
#[derive(Debug, Serialize)]
pub struct WeatherResponse {
    #[serde(flatten)]
    pub weather: Weather,
    pub conditions: Conditions,
}

/// Request to save the current search as a favorite.
#[derive(Debug, Deserialize)]
pub struct SaveFavoriteRequest {
    /// Defaults to e.g. "pickup: 100 Summer Stre..."
    pub name: Option<String>,
    pub address: String,
    pub kind: Option<String>,
    pub radius: Option<f64>,
    pub direction: Option<String>,
}

/// A saved favorite.
#[derive(Debug, Serialize)]
pub struct FavoriteResult {
    pub name: String,
    #[serde(flatten)]
    pub favorite: Favorite,
}

/// Optional flags for running a favorite's search.
#[derive(Debug, Default, Deserialize)]
pub struct FavoriteSearchRequest {
    #[serde(default)]
    pub refresh: bool,
}

/// Request to set the weather API key.
#[derive(Debug, Deserialize)]
pub struct ApiKeyRequest {
    pub api_key: String,

    /// Persist the key to the settings file
    #[serde(default)]
    pub remember: bool,
}

/// Response after setting the API key.
#[derive(Debug, Serialize)]
pub struct ApiKeyResponse {
    pub weather_enabled: bool,
    pub remembered: bool,
}

/// A click on the map, relative to the current search origin.
#[derive(Debug, Deserialize)]
pub struct LocationClickRequest {
    pub lat: f64,
    pub lon: f64,
    pub from_lat: f64,
    pub from_lon: f64,
}

/// Response for a map click.
#[derive(Debug, Serialize)]
pub struct LocationClickResponse {
    pub distance_miles: f64,

    /// Location to search from; absent when the click was too close
    pub location: Option<GeocodeResult>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

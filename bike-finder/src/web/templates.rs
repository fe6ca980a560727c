//! Askama templates for the web frontend.

use askama::Template;

use crate::geo::Direction;
use crate::nearby::{AvailabilitySummary, NearbyStation, SearchKind};

use super::map::{MarkerStyle, radius_options};

// ============================================================================
// Page Templates
// ============================================================================

/// Home page with search form, map and favorites.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub radii: Vec<RadiusOption>,
    pub directions: Vec<DirectionOption>,
    pub favorites: Vec<String>,
    pub weather_enabled: bool,
}

impl IndexTemplate {
    pub fn new(favorites: Vec<String>, weather_enabled: bool) -> Self {
        let radii = radius_options()
            .map(|miles| RadiusOption {
                value: miles.to_string(),
                label: format!("{miles} mi"),
                selected: miles == super::map::DEFAULT_RADIUS_MILES,
            })
            .collect();

        let directions = std::iter::once(DirectionOption {
            value: "all",
            label: "All directions",
        })
        .chain(Direction::ALL.into_iter().map(|d| DirectionOption {
            value: d.as_str(),
            label: d.short_label(),
        }))
        .collect();

        Self {
            radii,
            directions,
            favorites,
            weather_enabled,
        }
    }
}

// ============================================================================
// Fragment Templates (AJAX responses)
// ============================================================================

/// Nearby results fragment: summary metrics and the station list.
///
/// Each station row carries its marker data as attributes so the page
/// script can draw the map from the same response.
#[derive(Template)]
#[template(path = "nearby_results.html")]
pub struct NearbyResultsTemplate {
    pub origin_label: String,
    pub origin_lat: f64,
    pub origin_lon: f64,
    pub origin_marker: MarkerStyle,
    pub radius_miles: f64,
    pub zoom: u8,
    pub metrics: Vec<MetricView>,
    pub stations: Vec<StationView>,
    pub filtered_out: Option<String>,
    pub message: Option<String>,
    pub from_cache: bool,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

#[derive(Debug, Clone)]
pub struct RadiusOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone)]
pub struct DirectionOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// One summary figure, e.g. "With Bikes: 4".
#[derive(Debug, Clone, PartialEq)]
pub struct MetricView {
    pub label: &'static str,
    pub value: String,
}

impl MetricView {
    fn new(label: &'static str, value: impl ToString) -> Self {
        Self {
            label,
            value: value.to_string(),
        }
    }

    /// The four headline figures for a search.
    pub fn from_summary(summary: &AvailabilitySummary) -> Vec<Self> {
        match *summary {
            AvailabilitySummary::Pickup {
                stations,
                with_bikes,
                regular,
                ebikes,
            } => vec![
                Self::new("Stations", stations),
                Self::new("With Bikes", with_bikes),
                Self::new("Regular", regular),
                Self::new("E-bikes", ebikes),
            ],
            AvailabilitySummary::Dropoff {
                stations,
                with_docks,
                full,
                free_docks,
            } => vec![
                Self::new("Stations", stations),
                Self::new("With Docks", with_docks),
                Self::new("Full", full),
                Self::new("Free Docks", free_docks),
            ],
        }
    }
}

/// Station row view model.
#[derive(Debug, Clone)]
pub struct StationView {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Walking distance, one decimal place
    pub walk: String,
    pub marker: MarkerStyle,
    pub tooltip: String,
    /// Availability lines for the popup and list row
    pub details: Vec<String>,
    pub out_of_service: bool,
}

impl StationView {
    pub fn from_nearby(kind: SearchKind, nearby: &NearbyStation) -> Self {
        let s = &nearby.station;
        let (tooltip, details, out_of_service) = match kind {
            SearchKind::Pickup => (
                format!("{} | {} bikes", s.name, s.bikes_available()),
                vec![
                    format!("E-bikes: {}", s.ebikes_available()),
                    format!("Regular: {}", s.regular_bikes_available()),
                ],
                !s.is_renting(),
            ),
            SearchKind::Dropoff => (
                format!("{} | {} docks", s.name, s.docks_available()),
                vec![format!("Free docks: {}", s.docks_available())],
                !s.is_returning(),
            ),
        };

        Self {
            name: s.name.clone(),
            lat: s.coord.lat,
            lon: s.coord.lon,
            walk: format!("{:.1}", nearby.walking_miles),
            marker: MarkerStyle::for_station(kind, s),
            tooltip,
            details,
            out_of_service,
        }
    }
}

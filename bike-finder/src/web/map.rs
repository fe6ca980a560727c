//! Map presentation rules: marker styles, zoom levels and messages.

use serde::Serialize;

use crate::geo::{Coord, Direction, haversine_miles};
use crate::geocode::GeocodeResult;
use crate::inventory::Station;
use crate::nearby::SearchKind;

/// A click closer than this to the current origin is ignored.
pub const MIN_CLICK_MILES: f64 = 0.05;

/// Radius offered by the search form when none is given.
pub const DEFAULT_RADIUS_MILES: f64 = 0.5;

/// Radii offered by the search form, with their map zoom.
const ZOOM_BY_RADIUS: [(f64, u8); 7] = [
    (0.1, 17),
    (0.25, 16),
    (0.5, 15),
    (0.75, 14),
    (1.0, 14),
    (1.5, 13),
    (2.0, 13),
];

const DEFAULT_ZOOM: u8 = 14;

/// Marker colour and Font Awesome icon name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkerStyle {
    pub color: &'static str,
    pub icon: &'static str,
}

impl MarkerStyle {
    const fn new(color: &'static str, icon: &'static str) -> Self {
        Self { color, icon }
    }

    /// Style of a station marker for the given search.
    pub fn for_station(kind: SearchKind, station: &Station) -> Self {
        match kind {
            SearchKind::Pickup => {
                let bikes = station.bikes_available();
                if bikes == 0 {
                    Self::new("red", "ban")
                } else if station.ebikes_available() > 0 {
                    Self::new("green", "bolt")
                } else if bikes >= 5 {
                    Self::new("blue", "bicycle")
                } else {
                    Self::new("orange", "bicycle")
                }
            }
            SearchKind::Dropoff => match station.docks_available() {
                0 => Self::new("red", "ban"),
                5.. => Self::new("green", "home"),
                _ => Self::new("orange", "home"),
            },
        }
    }

    /// Style of the search-origin marker.
    pub fn for_origin(kind: SearchKind) -> Self {
        match kind {
            SearchKind::Pickup => Self::new("red", "home"),
            SearchKind::Dropoff => Self::new("blue", "flag"),
        }
    }
}

/// Initial map zoom for a search radius.
pub fn zoom_for_radius(radius_miles: f64) -> u8 {
    ZOOM_BY_RADIUS
        .iter()
        .find(|(r, _)| (r - radius_miles).abs() < 1e-9)
        .map_or(DEFAULT_ZOOM, |&(_, zoom)| zoom)
}

/// Radii offered by the search form.
pub fn radius_options() -> impl Iterator<Item = f64> {
    ZOOM_BY_RADIUS.iter().map(|&(r, _)| r)
}

/// Shown when a search finds nothing.
pub fn no_results_message(radius_miles: f64, direction: Option<Direction>) -> String {
    let where_ = match direction {
        None => "all directions".to_string(),
        Some(d) => format!("the {d} direction"),
    };
    format!("No stations found within {radius_miles} mi walking distance in {where_}")
}

/// A map click that is far enough from `current` to search from.
///
/// Returns the distance and the location to search, or `None` for clicks
/// within [`MIN_CLICK_MILES`].
pub fn map_click(current: Coord, clicked: Coord) -> Option<(f64, GeocodeResult)> {
    let distance = haversine_miles(current, clicked);
    (distance > MIN_CLICK_MILES).then(|| (distance, GeocodeResult::from_map_click(clicked)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::Availability;

    fn station(bikes: u32, ebikes: u32, docks: u32) -> Station {
        Station {
            station_id: "1".to_string(),
            name: "Test".to_string(),
            coord: Coord::new(42.36, -71.06),
            capacity: None,
            availability: Some(Availability {
                bikes,
                ebikes,
                docks,
                is_renting: true,
                is_returning: true,
                last_reported: None,
            }),
        }
    }

    #[test]
    fn pickup_markers() {
        let style = |b, e| MarkerStyle::for_station(SearchKind::Pickup, &station(b, e, 0));
        assert_eq!(style(0, 0), MarkerStyle::new("red", "ban"));
        assert_eq!(style(2, 1), MarkerStyle::new("green", "bolt"));
        assert_eq!(style(5, 0), MarkerStyle::new("blue", "bicycle"));
        assert_eq!(style(4, 0), MarkerStyle::new("orange", "bicycle"));
    }

    #[test]
    fn dropoff_markers() {
        let style = |d| MarkerStyle::for_station(SearchKind::Dropoff, &station(0, 0, d));
        assert_eq!(style(0), MarkerStyle::new("red", "ban"));
        assert_eq!(style(5), MarkerStyle::new("green", "home"));
        assert_eq!(style(3), MarkerStyle::new("orange", "home"));
    }

    #[test]
    fn station_without_status_shows_as_empty() {
        let mut s = station(3, 0, 3);
        s.availability = None;
        assert_eq!(
            MarkerStyle::for_station(SearchKind::Pickup, &s),
            MarkerStyle::new("red", "ban")
        );
    }

    #[test]
    fn zoom_levels() {
        assert_eq!(zoom_for_radius(0.1), 17);
        assert_eq!(zoom_for_radius(0.5), 15);
        assert_eq!(zoom_for_radius(2.0), 13);
        assert_eq!(zoom_for_radius(0.3), 14);
    }

    #[test]
    fn empty_result_messages() {
        assert_eq!(
            no_results_message(0.5, None),
            "No stations found within 0.5 mi walking distance in all directions"
        );
        assert_eq!(
            no_results_message(0.25, Some(Direction::NorthEast)),
            "No stations found within 0.25 mi walking distance in the northeast direction"
        );
    }

    #[test]
    fn nearby_clicks_are_ignored() {
        let here = Coord::new(42.3601, -71.0589);
        assert!(map_click(here, Coord::new(42.3602, -71.0589)).is_none());

        let (distance, location) = map_click(here, Coord::new(42.3701, -71.0589)).unwrap();
        assert!(distance > 0.6 && distance < 0.7);
        assert_eq!(location.address, "Map Location 42.3701, -71.0589");
        assert!(location.success);
    }
}

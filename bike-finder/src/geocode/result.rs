//! The outcome of geocoding one address.

use serde::{Deserialize, Serialize};

use crate::geo::Coord;

use super::client::Place;

/// Why an address could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeocodeFailure {
    /// Every candidate query came back empty or timed out
    NotFound,
    /// The provider rejected a request outright
    ServiceUnavailable,
}

/// Geocoding result for one input address.
///
/// Serialized with the same field names the settings file uses for a
/// favorite's stored location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    /// The address exactly as entered
    #[serde(default)]
    pub address: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub formatted_address: Option<String>,
    pub success: bool,
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<GeocodeFailure>,
}

impl GeocodeResult {
    /// A successful lookup.
    pub fn found(address: &str, place: Place) -> Self {
        Self {
            address: address.to_string(),
            lat: Some(place.coord.lat),
            lon: Some(place.coord.lon),
            formatted_address: Some(place.formatted_address),
            success: true,
            error: None,
            failure: None,
        }
    }

    /// A failed lookup.
    pub fn failed(address: &str, failure: GeocodeFailure) -> Self {
        Self {
            address: address.to_string(),
            lat: None,
            lon: None,
            formatted_address: None,
            success: false,
            error: Some(format!("Could not find location for: {address}")),
            failure: Some(failure),
        }
    }

    /// A location picked directly on the map.
    pub fn from_map_click(coord: Coord) -> Self {
        let label = format!("Map Location {:.4}, {:.4}", coord.lat, coord.lon);
        Self {
            formatted_address: Some(format!("Map Location ({:.4}, {:.4})", coord.lat, coord.lon)),
            ..Self::found(
                &label,
                Place {
                    coord,
                    formatted_address: String::new(),
                },
            )
        }
    }

    /// The resolved coordinates, if the lookup succeeded.
    pub fn coord(&self) -> Option<Coord> {
        match (self.success, self.lat, self.lon) {
            (true, Some(lat), Some(lon)) => Some(Coord::new(lat, lon)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_message_names_address() {
        let r = GeocodeResult::failed("Nowhere Rd", GeocodeFailure::NotFound);
        assert!(!r.success);
        assert_eq!(
            r.error.as_deref(),
            Some("Could not find location for: Nowhere Rd")
        );
        assert!(r.coord().is_none());
    }

    #[test]
    fn map_click_location() {
        let r = GeocodeResult::from_map_click(Coord::new(42.35012, -71.08123));
        assert!(r.success);
        assert_eq!(r.address, "Map Location 42.3501, -71.0812");
        assert_eq!(
            r.formatted_address.as_deref(),
            Some("Map Location (42.3501, -71.0812)")
        );
        assert_eq!(r.coord(), Some(Coord::new(42.35012, -71.08123)));
    }

    #[test]
    fn deserializes_stored_location_without_address() {
        let json = r#"{"lat":42.36,"lon":-71.05,"formatted_address":"Boston","success":true,"error":null}"#;
        let r: GeocodeResult = serde_json::from_str(json).unwrap();
        assert_eq!(r.coord(), Some(Coord::new(42.36, -71.05)));
        assert_eq!(r.address, "");
        assert!(r.failure.is_none());
    }
}

//! Geodesy helpers: great-circle distance, bearings and compass sectors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Mean Earth radius in miles.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Metres to statute miles.
pub const MILES_PER_METER: f64 = 0.000621371;

/// Width of one compass sector in degrees.
const SECTOR_WIDTH: f64 = 45.0;

/// A WGS84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

impl Coord {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Coordinates scaled to integer micro-degrees (6 decimal places).
    ///
    /// Used wherever a coordinate takes part in a hash key.
    pub fn micro_degrees(&self) -> (i64, i64) {
        (
            (self.lat * 1e6).round() as i64,
            (self.lon * 1e6).round() as i64,
        )
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lon)
    }
}

/// Great-circle distance between two points in miles.
///
/// # Examples
///
/// ```
/// use bike_finder::geo::{Coord, haversine_miles};
///
/// let a = Coord::new(42.3601, -71.0589);
/// assert_eq!(haversine_miles(a, a), 0.0);
/// ```
pub fn haversine_miles(a: Coord, b: Coord) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_MILES * c
}

/// Initial compass bearing from `a` towards `b`, in `[0, 360)`.
pub fn bearing_degrees(a: Coord, b: Coord) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    let bearing = y.atan2(x).to_degrees().rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if bearing >= 360.0 { 0.0 } else { bearing }
}

/// One of the eight 45°-wide compass sectors.
///
/// Each sector covers `[center - 22.5, center + 22.5)`; north wraps
/// around 0°.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// All sectors, clockwise from north.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// The sector containing a bearing.
    pub fn from_bearing(bearing: f64) -> Self {
        let shifted = (bearing + SECTOR_WIDTH / 2.0).rem_euclid(360.0);
        let idx = (shifted / SECTOR_WIDTH).floor() as usize % Self::ALL.len();
        Self::ALL[idx]
    }

    /// Centre bearing of this sector.
    pub fn center(&self) -> f64 {
        let idx = Self::ALL.iter().position(|d| d == self).unwrap_or(0);
        idx as f64 * SECTOR_WIDTH
    }

    /// Whether a bearing falls inside this sector.
    pub fn contains(&self, bearing: f64) -> bool {
        Self::from_bearing(bearing) == *self
    }

    /// Lowercase full name, as used in query strings and saved favorites.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::NorthEast => "northeast",
            Direction::East => "east",
            Direction::SouthEast => "southeast",
            Direction::South => "south",
            Direction::SouthWest => "southwest",
            Direction::West => "west",
            Direction::NorthWest => "northwest",
        }
    }

    /// Compass abbreviation for display ("N", "NE", ...).
    pub fn short_label(&self) -> &'static str {
        match self {
            Direction::North => "N",
            Direction::NorthEast => "NE",
            Direction::East => "E",
            Direction::SouthEast => "SE",
            Direction::South => "S",
            Direction::SouthWest => "SW",
            Direction::West => "W",
            Direction::NorthWest => "NW",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown direction name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction: {0}")]
pub struct InvalidDirection(String);

impl FromStr for Direction {
    type Err = InvalidDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == lower || d.short_label().eq_ignore_ascii_case(&lower))
            .ok_or(InvalidDirection(s.to_string()))
    }
}

/// Parse an optional direction filter, where `"all"` or blank means no filter.
pub fn parse_direction_filter(s: Option<&str>) -> Result<Option<Direction>, InvalidDirection> {
    match s.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("all") => Ok(None),
        Some(s) => s.parse().map(Some),
    }
}

/// Direction test where `None` ("all") matches every bearing.
pub fn in_direction(bearing: f64, direction: Option<Direction>) -> bool {
    direction.is_none_or(|d| d.contains(bearing))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn coord_strategy() -> impl Strategy<Value = Coord> {
        (-80.0f64..80.0, -179.0f64..179.0).prop_map(|(lat, lon)| Coord::new(lat, lon))
    }

    proptest! {
        #[test]
        fn every_bearing_in_exactly_one_sector(bearing in 0.0f64..360.0) {
            let matches = Direction::ALL.iter().filter(|d| d.contains(bearing)).count();
            prop_assert_eq!(matches, 1, "bearing {} matched {} sectors", bearing, matches);
        }

        #[test]
        fn bearing_is_normalized(a in coord_strategy(), b in coord_strategy()) {
            let bearing = bearing_degrees(a, b);
            prop_assert!((0.0..360.0).contains(&bearing), "bearing {}", bearing);
        }

        #[test]
        fn haversine_is_symmetric(a in coord_strategy(), b in coord_strategy()) {
            let ab = haversine_miles(a, b);
            let ba = haversine_miles(b, a);
            prop_assert!(ab >= 0.0);
            prop_assert!((ab - ba).abs() < 1e-6, "{} vs {}", ab, ba);
        }
    }
}

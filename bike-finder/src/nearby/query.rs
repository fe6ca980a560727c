//! Search parameters and the result-cache key derived from them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geo::{Coord, Direction};

/// Label attached to results when the caller doesn't name the search.
pub const DEFAULT_LABEL: &str = "Search Location";

/// What the user is looking for. Affects presentation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    /// Stations with bikes to pick up
    #[default]
    Pickup,
    /// Stations with free docks to return a bike
    Dropoff,
}

impl SearchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Pickup => "pickup",
            SearchKind::Dropoff => "dropoff",
        }
    }

    /// Button-style title, e.g. "Find bikes".
    pub fn title(&self) -> &'static str {
        match self {
            SearchKind::Pickup => "Find bikes",
            SearchKind::Dropoff => "Find docks",
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pickup" | "bikes" => Ok(SearchKind::Pickup),
            "dropoff" | "docks" => Ok(SearchKind::Dropoff),
            other => Err(format!("unknown search kind: {other}")),
        }
    }
}

/// A nearby-station search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub origin: Coord,
    pub radius_miles: f64,
    /// `None` searches in all directions
    pub direction: Option<Direction>,
    pub kind: SearchKind,
    /// Display name of the search location, attached to every result
    pub label: String,
}

impl SearchQuery {
    pub fn new(origin: Coord, radius_miles: f64) -> Self {
        Self {
            origin,
            radius_miles,
            direction: None,
            kind: SearchKind::default(),
            label: DEFAULT_LABEL.to_string(),
        }
    }

    pub fn with_direction(mut self, direction: Option<Direction>) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_kind(mut self, kind: SearchKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// Result-cache key: origin to 6 decimal places, radius and direction.
///
/// Kind and label are deliberately excluded: pickup and dropoff searches
/// from the same spot share walking distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchKey {
    origin: (i64, i64),
    radius_micro_miles: i64,
    direction: Option<Direction>,
}

impl From<&SearchQuery> for SearchKey {
    fn from(query: &SearchQuery) -> Self {
        Self {
            origin: query.origin.micro_degrees(),
            radius_micro_miles: (query.radius_miles * 1e6).round() as i64,
            direction: query.direction,
        }
    }
}

impl fmt::Display for SearchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.6}_{:.6}_{}_{}",
            self.origin.0 as f64 / 1e6,
            self.origin.1 as f64 / 1e6,
            self.radius_micro_miles as f64 / 1e6,
            self.direction.map_or("all", |d| d.as_str())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn downtown() -> Coord {
        Coord::new(42.3601, -71.0589)
    }

    #[test]
    fn key_display() {
        let query = SearchQuery::new(downtown(), 0.5);
        assert_eq!(
            SearchKey::from(&query).to_string(),
            "42.360100_-71.058900_0.5_all"
        );

        let query = query.with_direction(Some(Direction::NorthEast));
        assert_eq!(
            SearchKey::from(&query).to_string(),
            "42.360100_-71.058900_0.5_northeast"
        );
    }

    #[test]
    fn key_ignores_kind_and_label() {
        let a = SearchQuery::new(downtown(), 0.5);
        let b = SearchQuery::new(downtown(), 0.5)
            .with_kind(SearchKind::Dropoff)
            .with_label("Work");
        assert_eq!(SearchKey::from(&a), SearchKey::from(&b));
    }

    #[test]
    fn key_rounds_origin_to_six_places() {
        let a = SearchQuery::new(Coord::new(42.36010001, -71.05890001), 0.5);
        let b = SearchQuery::new(downtown(), 0.5);
        assert_eq!(SearchKey::from(&a), SearchKey::from(&b));

        let c = SearchQuery::new(Coord::new(42.360101, -71.0589), 0.5);
        assert_ne!(SearchKey::from(&c), SearchKey::from(&b));
    }

    #[test]
    fn key_distinguishes_radius_and_direction() {
        let base = SearchQuery::new(downtown(), 0.5);
        let wider = SearchQuery::new(downtown(), 0.75);
        let north = base.clone().with_direction(Some(Direction::North));
        assert_ne!(SearchKey::from(&base), SearchKey::from(&wider));
        assert_ne!(SearchKey::from(&base), SearchKey::from(&north));
    }

    #[test]
    fn parse_kinds() {
        assert_eq!("pickup".parse::<SearchKind>().unwrap(), SearchKind::Pickup);
        assert_eq!("Docks".parse::<SearchKind>().unwrap(), SearchKind::Dropoff);
        assert!("scooters".parse::<SearchKind>().is_err());
        assert_eq!(SearchKind::Dropoff.title(), "Find docks");
    }
}

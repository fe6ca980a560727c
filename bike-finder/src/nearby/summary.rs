//! Counts reported alongside a nearby search.

use serde::Serialize;

use super::query::SearchKind;
use super::resolver::NearbyStation;

/// Why stations that passed the straight-line filter were dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterSummary {
    /// Stations within the radius as the crow flies (and in direction)
    pub candidates: usize,
    /// Dropped because no plausible walking route exists
    pub unreachable: usize,
    /// Dropped because the walk is longer than the radius
    pub too_far: usize,
}

impl FilterSummary {
    /// Human-readable breakdown, e.g. "2 blocked by barriers, 1 too far to walk".
    ///
    /// `None` when nothing was dropped.
    pub fn describe(&self) -> Option<String> {
        let mut parts = Vec::new();
        if self.unreachable > 0 {
            parts.push(format!("{} blocked by barriers", self.unreachable));
        }
        if self.too_far > 0 {
            parts.push(format!("{} too far to walk", self.too_far));
        }
        (!parts.is_empty()).then(|| parts.join(", "))
    }
}

/// Totals across a result list, shaped by what the user is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AvailabilitySummary {
    Pickup {
        stations: usize,
        with_bikes: usize,
        regular: u32,
        ebikes: u32,
    },
    Dropoff {
        stations: usize,
        with_docks: usize,
        full: usize,
        free_docks: u32,
    },
}

impl AvailabilitySummary {
    pub fn of(kind: SearchKind, results: &[NearbyStation]) -> Self {
        let stations = results.len();
        match kind {
            SearchKind::Pickup => AvailabilitySummary::Pickup {
                stations,
                with_bikes: results
                    .iter()
                    .filter(|r| r.station.bikes_available() > 0)
                    .count(),
                regular: results
                    .iter()
                    .map(|r| r.station.regular_bikes_available())
                    .sum(),
                ebikes: results.iter().map(|r| r.station.ebikes_available()).sum(),
            },
            SearchKind::Dropoff => {
                let with_docks = results
                    .iter()
                    .filter(|r| r.station.docks_available() > 0)
                    .count();
                AvailabilitySummary::Dropoff {
                    stations,
                    with_docks,
                    full: stations - with_docks,
                    free_docks: results.iter().map(|r| r.station.docks_available()).sum(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coord;
    use crate::inventory::{Availability, Station};

    fn result(bikes: u32, ebikes: u32, docks: u32) -> NearbyStation {
        NearbyStation {
            station: Station {
                station_id: format!("{bikes}-{ebikes}-{docks}"),
                name: "S".to_string(),
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
            },
            straight_miles: 0.1,
            walking_miles: 0.2,
            label: "Search Location".to_string(),
        }
    }

    #[test]
    fn describe_lists_non_zero_parts() {
        let none = FilterSummary {
            candidates: 4,
            ..FilterSummary::default()
        };
        assert_eq!(none.describe(), None);

        let both = FilterSummary {
            candidates: 6,
            unreachable: 2,
            too_far: 1,
        };
        assert_eq!(
            both.describe().as_deref(),
            Some("2 blocked by barriers, 1 too far to walk")
        );

        let far = FilterSummary {
            candidates: 3,
            unreachable: 0,
            too_far: 3,
        };
        assert_eq!(far.describe().as_deref(), Some("3 too far to walk"));
    }

    #[test]
    fn pickup_totals() {
        let results = [result(5, 2, 3), result(0, 0, 10), result(1, 3, 0)];
        assert_eq!(
            AvailabilitySummary::of(SearchKind::Pickup, &results),
            AvailabilitySummary::Pickup {
                stations: 3,
                with_bikes: 2,
                regular: 3,
                ebikes: 5,
            }
        );
    }

    #[test]
    fn dropoff_totals() {
        let results = [result(5, 2, 3), result(0, 0, 10), result(1, 3, 0)];
        assert_eq!(
            AvailabilitySummary::of(SearchKind::Dropoff, &results),
            AvailabilitySummary::Dropoff {
                stations: 3,
                with_docks: 2,
                full: 1,
                free_docks: 13,
            }
        );
    }
}

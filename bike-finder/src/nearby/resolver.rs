//! Two-phase nearby-station search with a result cache.
//!
//! Phase one keeps stations within the radius as the crow flies (and in
//! the requested direction). Phase two asks the router for a walking
//! distance to each survivor and keeps those whose walk also fits the
//! radius. Results are sorted by walking distance.
//!
//! Result lists are cached by [`SearchKey`]. A cache hit re-reads live
//! counts from the current inventory so availability is never stale, while
//! the distances and ordering from the original search are kept.

use std::sync::Arc;

use moka::future::Cache as MokaCache;
use serde::Serialize;
use tracing::{debug, info};

use crate::geo::{bearing_degrees, haversine_miles, in_direction};
use crate::inventory::{Inventory, Station};
use crate::routing::{RouteProvider, WalkingDistance, WalkingDistances};

use super::query::{SearchKey, SearchQuery};
use super::summary::FilterSummary;

/// Errors from a nearby search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NearbyError {
    /// No station inventory is available to search
    #[error("station data is unavailable")]
    NoInventory,
}

/// A station that passed both filters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyStation {
    #[serde(flatten)]
    pub station: Station,
    /// Great-circle distance from the search origin
    pub straight_miles: f64,
    /// Routed walking distance from the search origin
    pub walking_miles: f64,
    /// Label of the search that produced this result
    pub label: String,
}

/// Whether results came from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    Hit,
    Miss,
}

/// Result of a nearby search.
#[derive(Debug, Clone)]
pub struct NearbyOutcome {
    /// Sorted by walking distance, nearest first
    pub stations: Vec<NearbyStation>,
    /// Drop counts; all zero on a cache hit
    pub summary: FilterSummary,
    pub cache: CacheStatus,
}

/// Finds stations within walking distance of a point.
pub struct NearbyResolver<P> {
    walking: WalkingDistances<P>,
    results: MokaCache<SearchKey, Arc<Vec<NearbyStation>>>,
}

impl<P: RouteProvider> NearbyResolver<P> {
    pub fn new(walking: WalkingDistances<P>) -> Self {
        Self {
            walking,
            results: MokaCache::builder().build(),
        }
    }

    /// The walking-distance lookup shared by every search.
    pub fn walking(&self) -> &WalkingDistances<P> {
        &self.walking
    }

    /// Stations reachable on foot within `query.radius_miles`.
    ///
    /// With `force_refresh` the result cache is bypassed and the entry for
    /// this search is replaced.
    pub async fn find_nearby(
        &self,
        inventory: &Inventory,
        query: &SearchQuery,
        force_refresh: bool,
    ) -> Result<NearbyOutcome, NearbyError> {
        if inventory.is_empty() {
            return Err(NearbyError::NoInventory);
        }

        let key = SearchKey::from(query);
        if !force_refresh
            && let Some(cached) = self.results.get(&key).await
        {
            match refresh_availability(&cached, inventory, &query.label) {
                Some(stations) => {
                    debug!(%key, count = stations.len(), "nearby cache hit");
                    return Ok(NearbyOutcome {
                        stations,
                        summary: FilterSummary::default(),
                        cache: CacheStatus::Hit,
                    });
                }
                None => {
                    debug!(%key, "cached stations changed, recomputing");
                    self.results.invalidate(&key).await;
                }
            }
        }

        let outcome = self.compute(inventory, query).await;
        if outcome.stations.is_empty() {
            self.results.invalidate(&key).await;
        } else {
            self.results
                .insert(key, Arc::new(outcome.stations.clone()))
                .await;
        }
        Ok(outcome)
    }

    async fn compute(&self, inventory: &Inventory, query: &SearchQuery) -> NearbyOutcome {
        let candidates = straight_line_candidates(inventory, query);
        let mut summary = FilterSummary {
            candidates: candidates.len(),
            ..FilterSummary::default()
        };

        let mut stations = Vec::with_capacity(candidates.len());
        for (station, straight_miles) in candidates {
            match self
                .walking
                .walking_distance(query.origin, station.coord)
                .await
            {
                WalkingDistance::Unreachable(_) => summary.unreachable += 1,
                WalkingDistance::Walkable(miles) if miles > query.radius_miles => {
                    summary.too_far += 1
                }
                WalkingDistance::Walkable(walking_miles) => stations.push(NearbyStation {
                    station: station.clone(),
                    straight_miles,
                    walking_miles,
                    label: query.label.clone(),
                }),
            }
        }

        // Stable, so equal distances keep inventory order.
        stations.sort_by(|a, b| a.walking_miles.total_cmp(&b.walking_miles));

        info!(
            origin = %query.origin,
            radius = query.radius_miles,
            candidates = summary.candidates,
            found = stations.len(),
            unreachable = summary.unreachable,
            too_far = summary.too_far,
            "nearby search"
        );

        NearbyOutcome {
            stations,
            summary,
            cache: CacheStatus::Miss,
        }
    }

    /// Number of cached result lists.
    pub fn cached_count(&self) -> u64 {
        self.results.entry_count()
    }
}

/// Phase one: stations inside the radius and direction sector, with their
/// straight-line distance.
fn straight_line_candidates<'a>(
    inventory: &'a Inventory,
    query: &SearchQuery,
) -> Vec<(&'a Station, f64)> {
    inventory
        .stations()
        .iter()
        .filter_map(|station| {
            let straight = haversine_miles(query.origin, station.coord);
            if straight.is_nan() || straight > query.radius_miles {
                return None;
            }
            let bearing = bearing_degrees(query.origin, station.coord);
            in_direction(bearing, query.direction).then_some((station, straight))
        })
        .collect()
}

/// Copy live counts from `inventory` and the current search's label onto
/// cached results.
///
/// Stations no longer in the inventory are dropped. Returns `None` when the
/// cached list can't be reused: nothing survived, or a station moved so
/// its distances no longer hold.
fn refresh_availability(
    cached: &[NearbyStation],
    inventory: &Inventory,
    label: &str,
) -> Option<Vec<NearbyStation>> {
    let mut refreshed = Vec::with_capacity(cached.len());
    for entry in cached {
        let Some(current) = inventory.get(&entry.station.station_id) else {
            continue;
        };
        if current.coord != entry.station.coord {
            return None;
        }
        let mut entry = entry.clone();
        entry.station.availability = current.availability;
        entry.label = label.to_string();
        refreshed.push(entry);
    }
    (!refreshed.is_empty()).then_some(refreshed)
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;

//! Walking distances with a plausibility check and a directional cache.
//!
//! Router answers are cached for the lifetime of the [`WalkingDistances`]
//! value, failures included, so a point pair that cannot be routed is only
//! asked about once.

use moka::future::Cache as MokaCache;
use tracing::{debug, warn};

use crate::geo::{Coord, MILES_PER_METER, haversine_miles};

use super::client::RouteProvider;

/// Default ceiling on walking distance relative to straight-line distance.
pub const DEFAULT_MAX_DETOUR_FACTOR: f64 = 3.0;

/// Why no usable walking distance exists between two points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnreachableReason {
    /// The router found no route
    NoRoute,
    /// The route is implausibly long compared to the straight line,
    /// typically because a river or highway forces a long detour
    Implausible,
    /// The router could not be reached or returned garbage
    ServiceError,
}

/// Walking distance between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WalkingDistance {
    /// Walkable, distance in miles
    Walkable(f64),
    Unreachable(UnreachableReason),
}

impl WalkingDistance {
    /// The distance in miles, if walkable.
    pub fn miles(&self) -> Option<f64> {
        match self {
            WalkingDistance::Walkable(miles) => Some(*miles),
            WalkingDistance::Unreachable(_) => None,
        }
    }
}

/// Cache key: origin and destination in micro-degrees.
///
/// Directional: `(a, b)` and `(b, a)` are distinct keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteKey {
    from: (i64, i64),
    to: (i64, i64),
}

impl RouteKey {
    pub fn new(from: Coord, to: Coord) -> Self {
        Self {
            from: from.micro_degrees(),
            to: to.micro_degrees(),
        }
    }
}

/// Walking-distance lookup backed by a [`RouteProvider`].
pub struct WalkingDistances<P> {
    provider: P,
    max_detour_factor: f64,
    cache: MokaCache<RouteKey, WalkingDistance>,
}

impl<P: RouteProvider> WalkingDistances<P> {
    pub fn new(provider: P) -> Self {
        Self::with_detour_factor(provider, DEFAULT_MAX_DETOUR_FACTOR)
    }

    /// Create with a custom plausibility ceiling.
    pub fn with_detour_factor(provider: P, max_detour_factor: f64) -> Self {
        Self {
            provider,
            max_detour_factor,
            cache: MokaCache::builder().build(),
        }
    }

    /// Walking distance from `from` to `to`.
    pub async fn walking_distance(&self, from: Coord, to: Coord) -> WalkingDistance {
        let key = RouteKey::new(from, to);
        if let Some(hit) = self.cache.get(&key).await {
            return hit;
        }

        let distance = self.fetch(from, to).await;
        self.cache.insert(key, distance).await;
        distance
    }

    async fn fetch(&self, from: Coord, to: Coord) -> WalkingDistance {
        let meters = match self.provider.walking_route_meters(from, to).await {
            Ok(Some(meters)) => meters,
            Ok(None) => return WalkingDistance::Unreachable(UnreachableReason::NoRoute),
            Err(e) => {
                warn!(%from, %to, error = %e, "routing request failed");
                return WalkingDistance::Unreachable(UnreachableReason::ServiceError);
            }
        };

        let miles = meters * MILES_PER_METER;
        let straight = haversine_miles(from, to);
        if miles > straight * self.max_detour_factor {
            debug!(%from, %to, miles, straight, "discarding implausible route");
            return WalkingDistance::Unreachable(UnreachableReason::Implausible);
        }

        WalkingDistance::Walkable(miles)
    }

    /// Number of cached point pairs.
    pub fn cached_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Whether a distance for this exact direction is cached.
    pub fn is_cached(&self, from: Coord, to: Coord) -> bool {
        self.cache.contains_key(&RouteKey::new(from, to))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::routing::RoutingError;

    /// Provider that returns a fixed answer and counts calls.
    struct FixedProvider {
        meters: Option<f64>,
        fail: bool,
        calls: Mutex<usize>,
    }

    impl FixedProvider {
        fn meters(meters: f64) -> Self {
            Self {
                meters: Some(meters),
                fail: false,
                calls: Mutex::new(0),
            }
        }

        fn no_route() -> Self {
            Self {
                meters: None,
                fail: false,
                calls: Mutex::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                meters: None,
                fail: true,
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    impl RouteProvider for FixedProvider {
        async fn walking_route_meters(
            &self,
            _from: Coord,
            _to: Coord,
        ) -> Result<Option<f64>, RoutingError> {
            *self.calls.lock().unwrap() += 1;
            if self.fail {
                return Err(RoutingError::Api {
                    status: 500,
                    message: "boom".into(),
                });
            }
            Ok(self.meters)
        }
    }

    /// Two points exactly one mile apart along a meridian.
    fn one_mile_apart() -> (Coord, Coord) {
        let a = Coord::new(42.0, -71.0);
        let b = Coord::new(42.0 + 1.0 / 69.0969, -71.0);
        (a, b)
    }

    fn meters_for_miles(miles: f64) -> f64 {
        miles / MILES_PER_METER
    }

    #[tokio::test]
    async fn converts_meters_to_miles() {
        let (a, b) = one_mile_apart();
        let walking = WalkingDistances::new(FixedProvider::meters(meters_for_miles(1.4)));

        let miles = walking.walking_distance(a, b).await.miles().unwrap();
        assert!((miles - 1.4).abs() < 1e-9);
    }

    #[tokio::test]
    async fn five_miles_for_one_straight_is_unreachable() {
        let (a, b) = one_mile_apart();
        let walking = WalkingDistances::new(FixedProvider::meters(meters_for_miles(5.0)));

        assert_eq!(
            walking.walking_distance(a, b).await,
            WalkingDistance::Unreachable(UnreachableReason::Implausible)
        );
    }

    #[tokio::test]
    async fn just_under_three_times_is_walkable() {
        let (a, b) = one_mile_apart();
        let straight = haversine_miles(a, b);
        let walking =
            WalkingDistances::new(FixedProvider::meters(meters_for_miles(straight * 2.99)));

        assert!(walking.walking_distance(a, b).await.miles().is_some());
    }

    #[tokio::test]
    async fn failures_are_cached() {
        let (a, b) = one_mile_apart();
        let walking = WalkingDistances::new(FixedProvider::failing());

        let first = walking.walking_distance(a, b).await;
        let second = walking.walking_distance(a, b).await;

        assert_eq!(
            first,
            WalkingDistance::Unreachable(UnreachableReason::ServiceError)
        );
        assert_eq!(first, second);
        assert_eq!(walking.provider.calls(), 1);
    }

    #[tokio::test]
    async fn no_route_is_unreachable() {
        let (a, b) = one_mile_apart();
        let walking = WalkingDistances::new(FixedProvider::no_route());

        assert_eq!(
            walking.walking_distance(a, b).await,
            WalkingDistance::Unreachable(UnreachableReason::NoRoute)
        );
    }

    #[tokio::test]
    async fn cache_is_directional() {
        let (a, b) = one_mile_apart();
        let walking = WalkingDistances::new(FixedProvider::meters(meters_for_miles(1.2)));

        walking.walking_distance(a, b).await;
        assert!(walking.is_cached(a, b));
        assert!(!walking.is_cached(b, a));

        walking.walking_distance(b, a).await;
        assert_eq!(walking.provider.calls(), 2);
    }

    #[tokio::test]
    async fn nearby_coordinates_share_a_key() {
        let (a, b) = one_mile_apart();
        let walking = WalkingDistances::new(FixedProvider::meters(meters_for_miles(1.2)));

        walking.walking_distance(a, b).await;
        let a_jittered = Coord::new(a.lat + 1e-8, a.lon - 1e-8);
        walking.walking_distance(a_jittered, b).await;

        assert_eq!(walking.provider.calls(), 1);
    }

    #[test]
    fn route_keys_differ_by_direction() {
        let (a, b) = one_mile_apart();
        assert_ne!(RouteKey::new(a, b), RouteKey::new(b, a));
        assert_eq!(RouteKey::new(a, b), RouteKey::new(a, b));
    }
}

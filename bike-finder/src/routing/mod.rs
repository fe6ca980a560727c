//! Walking distances from an external router.
//!
//! The straight-line distance between two stations says little about how
//! far apart they are on foot when a river or highway sits between them, so
//! candidate stations are checked against real walking routes from OSRM.

mod client;
mod error;
mod walking;

pub use client::{OsrmClient, OsrmConfig, RouteProvider};
pub use error::RoutingError;
pub use walking::{
    DEFAULT_MAX_DETOUR_FACTOR, RouteKey, UnreachableReason, WalkingDistance, WalkingDistances,
};

//! Nearby-station search.
//!
//! Given a point and a radius, find the stations a person could actually
//! walk to within that radius, optionally limited to one compass sector.

mod query;
mod resolver;
mod summary;

pub use query::{DEFAULT_LABEL, SearchKey, SearchKind, SearchQuery};
pub use resolver::{CacheStatus, NearbyError, NearbyOutcome, NearbyResolver, NearbyStation};
pub use summary::{AvailabilitySummary, FilterSummary};

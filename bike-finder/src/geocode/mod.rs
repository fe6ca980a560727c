//! Address geocoding.
//!
//! Free-text addresses, including street intersections such as
//! "Ruggles St and Huntington Ave", are expanded into several candidate
//! queries and tried in turn against a geocoding provider (Nominatim by
//! default). Results are cached by the address as the user typed it.

mod client;
mod error;
mod query;
mod result;
mod service;

pub use client::{Geocoder, NominatimClient, NominatimConfig, Place};
pub use error::GeocodeError;
pub use query::{Locality, candidate_queries, is_intersection, normalize_intersection};
pub use result::{GeocodeFailure, GeocodeResult};
pub use service::{GeocodeConfig, GeocodeService};

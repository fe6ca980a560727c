//! Bike-share station inventory from a GBFS feed.
//!
//! A root discovery document lists the sub-feeds; station metadata
//! (`station_information`) and live counts (`station_status`) are fetched
//! from there and joined by station id.

mod client;
mod error;
mod station;
mod store;
mod types;

pub use client::{GbfsClient, GbfsConfig, InventorySource};
pub use error::InventoryError;
pub use station::{Availability, Inventory, Station, join_feeds};
pub use store::InventoryStore;
pub use types::{StationInformationDto, StationStatusDto};

//! Current weather for the search location.

mod client;
mod error;
mod types;

pub use client::{WeatherClient, WeatherConfig};
pub use error::WeatherError;
pub use types::{Conditions, Weather};

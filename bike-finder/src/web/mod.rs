//! Web layer for the station finder.
//!
//! Provides the map page and JSON/HTML endpoints for geocoding, nearby
//! searches, weather and saved favorites.

mod dto;
pub mod map;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;

//! User settings persisted between runs.

mod error;
mod model;
mod store;

pub use error::SettingsError;
pub use model::{Favorite, Settings};
pub use store::SettingsStore;

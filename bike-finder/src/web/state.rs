//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::geocode::{GeocodeService, NominatimClient};
use crate::inventory::{GbfsClient, InventoryStore};
use crate::nearby::NearbyResolver;
use crate::routing::OsrmClient;
use crate::settings::{Settings, SettingsStore};
use crate::weather::WeatherClient;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Address lookup with its result cache
    pub geocoder: Arc<GeocodeService<NominatimClient>>,

    /// Nearby search with the route and result caches
    pub resolver: Arc<NearbyResolver<OsrmClient>>,

    /// Latest station inventory
    pub inventory: InventoryStore<GbfsClient>,

    pub weather: Arc<WeatherClient>,

    /// In-memory settings, written through to `settings_store`
    pub settings: Arc<Mutex<Settings>>,
    pub settings_store: Arc<SettingsStore>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        geocoder: GeocodeService<NominatimClient>,
        resolver: NearbyResolver<OsrmClient>,
        inventory: InventoryStore<GbfsClient>,
        weather: WeatherClient,
        settings: Settings,
        settings_store: SettingsStore,
    ) -> Self {
        Self {
            geocoder: Arc::new(geocoder),
            resolver: Arc::new(resolver),
            inventory,
            weather: Arc::new(weather),
            settings: Arc::new(Mutex::new(settings)),
            settings_store: Arc::new(settings_store),
        }
    }
}

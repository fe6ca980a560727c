use bike_finder::config::AppConfig;
use bike_finder::geocode::{GeocodeConfig, GeocodeService, NominatimClient};
use bike_finder::inventory::{GbfsClient, InventoryStore};
use bike_finder::nearby::NearbyResolver;
use bike_finder::routing::{OsrmClient, WalkingDistances};
use bike_finder::settings::{Settings, SettingsStore};
use bike_finder::weather::WeatherClient;
use bike_finder::web::{AppState, create_router};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bike_finder=info")),
        )
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    // Saved settings; a broken file is reported and replaced on next save
    let settings_store = SettingsStore::new(&config.settings_path);
    let settings = settings_store.load().unwrap_or_else(|e| {
        warn!(error = %e, "could not load settings, using defaults");
        Settings::default()
    });

    // An API key from the environment wins over the saved one
    let mut weather_config = config.weather.clone();
    if weather_config.api_key.is_none() {
        weather_config.api_key = settings.api_key().map(str::to_string);
    }
    let weather = WeatherClient::new(weather_config).expect("Failed to create weather client");

    let nominatim =
        NominatimClient::new(config.nominatim.clone()).expect("Failed to create geocoding client");
    let geocoder = GeocodeService::new(nominatim, GeocodeConfig::default());

    let osrm = OsrmClient::new(config.osrm.clone()).expect("Failed to create routing client");
    let resolver = NearbyResolver::new(WalkingDistances::new(osrm));

    // Fetch stations up front; searches retry lazily if this fails
    let gbfs = GbfsClient::new(config.gbfs.clone()).expect("Failed to create GBFS client");
    let inventory = InventoryStore::new(gbfs);
    match inventory.refresh().await {
        Ok(snapshot) => info!(stations = snapshot.len(), "loaded station inventory"),
        Err(e) => warn!(error = %e, "initial inventory fetch failed"),
    }

    if let Some(period) = config.inventory_refresh {
        let inventory = inventory.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await; // First tick is immediate, skip it
            loop {
                interval.tick().await;
                if let Err(e) = inventory.refresh().await {
                    warn!(error = %e, "scheduled inventory refresh failed");
                }
            }
        });
    }

    let state = AppState::new(geocoder, resolver, inventory, weather, settings, settings_store);
    let app = create_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .expect("Failed to bind listen address");
    info!("Bike finder listening on http://{}", config.listen_addr);

    axum::serve(listener, app).await.expect("Server error");
}

//! Runtime configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::geocode::NominatimConfig;
use crate::inventory::GbfsConfig;
use crate::routing::OsrmConfig;
use crate::settings::SettingsStore;
use crate::weather::WeatherConfig;

const DEFAULT_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_STATIC_DIR: &str = "static";
const DEFAULT_REFRESH_SECS: u64 = 120;

/// Invalid configuration value.
#[derive(Debug, thiserror::Error)]
#[error("invalid {name}: {value}")]
pub struct ConfigError {
    name: &'static str,
    value: String,
}

/// Everything `main` needs to wire the server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub static_dir: String,
    pub settings_path: PathBuf,
    /// Background inventory refresh period; `None` disables it
    pub inventory_refresh: Option<Duration>,
    pub gbfs: GbfsConfig,
    pub osrm: OsrmConfig,
    pub nominatim: NominatimConfig,
    pub weather: WeatherConfig,
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `BIKE_FINDER_ADDR` | `127.0.0.1:3000` |
    /// | `BIKE_FINDER_STATIC` | `static` |
    /// | `BIKE_FINDER_SETTINGS` | `~/.bluebikes_config.json` |
    /// | `BIKE_FINDER_REFRESH_SECS` | `120` (`0` disables) |
    /// | `GBFS_URL` | Bluebikes discovery document |
    /// | `OSRM_URL` | public OSRM foot router |
    /// | `NOMINATIM_URL` | public Nominatim |
    /// | `OPENWEATHER_URL` | OpenWeatherMap 2.5 |
    /// | `OPENWEATHER_API_KEY` | unset (saved key is used) |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| get(name).filter(|v| !v.trim().is_empty());

        let addr = get("BIKE_FINDER_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let listen_addr = addr.parse().map_err(|_| ConfigError {
            name: "BIKE_FINDER_ADDR",
            value: addr.clone(),
        })?;

        let refresh_secs = match get("BIKE_FINDER_REFRESH_SECS") {
            Some(secs) => secs.trim().parse().map_err(|_| ConfigError {
                name: "BIKE_FINDER_REFRESH_SECS",
                value: secs.clone(),
            })?,
            None => DEFAULT_REFRESH_SECS,
        };

        let mut gbfs = GbfsConfig::new();
        if let Some(url) = get("GBFS_URL") {
            gbfs = gbfs.with_discovery_url(url);
        }
        let mut osrm = OsrmConfig::new();
        if let Some(url) = get("OSRM_URL") {
            osrm = osrm.with_base_url(url);
        }
        let mut nominatim = NominatimConfig::new();
        if let Some(url) = get("NOMINATIM_URL") {
            nominatim = nominatim.with_base_url(url);
        }
        let mut weather = WeatherConfig::new().with_api_key(get("OPENWEATHER_API_KEY"));
        if let Some(url) = get("OPENWEATHER_URL") {
            weather = weather.with_base_url(url);
        }

        Ok(Self {
            listen_addr,
            static_dir: get("BIKE_FINDER_STATIC").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
            settings_path: get("BIKE_FINDER_SETTINGS")
                .map(PathBuf::from)
                .unwrap_or_else(SettingsStore::default_path),
            inventory_refresh: (refresh_secs > 0).then_some(Duration::from_secs(refresh_secs)),
            gbfs,
            osrm,
            nominatim,
            weather,
        })
    }
}

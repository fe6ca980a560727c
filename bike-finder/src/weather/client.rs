//! OpenWeatherMap current-weather client.

use tokio::sync::RwLock;
use tracing::debug;

use crate::geo::Coord;

use super::error::WeatherError;
use super::types::{CurrentWeatherDto, Weather};

/// Default base URL for the OpenWeatherMap 2.5 API.
const DEFAULT_BASE_URL: &str = "http://api.openweathermap.org/data/2.5";

/// Key shipped in sample configuration files; treated as no key at all.
const PLACEHOLDER_KEY: &str = "your_openweathermap_api_key_here";

/// Configuration for the weather client.
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl WeatherConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key;
        self
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop blank and placeholder keys.
fn usable_key(key: Option<String>) -> Option<String> {
    key.map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty() && k != PLACEHOLDER_KEY)
}

/// Client for current conditions. Disabled while it has no usable key.
#[derive(Debug)]
pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: RwLock<Option<String>>,
}

impl WeatherClient {
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: RwLock::new(usable_key(config.api_key)),
        })
    }

    /// Replace the API key. A blank or placeholder key disables the client.
    pub async fn set_api_key(&self, key: Option<String>) {
        *self.api_key.write().await = usable_key(key);
    }

    pub async fn is_enabled(&self) -> bool {
        self.api_key.read().await.is_some()
    }

    /// Current weather at `at`, or `Ok(None)` when the client is disabled.
    pub async fn current_weather(&self, at: Coord) -> Result<Option<Weather>, WeatherError> {
        let Some(api_key) = self.api_key.read().await.clone() else {
            return Ok(None);
        };

        debug!(%at, "fetching current weather");
        let response = self
            .http
            .get(format!("{}/weather", self.base_url))
            .query(&[
                ("lat", at.lat.to_string()),
                ("lon", at.lon.to_string()),
                ("appid", api_key),
                ("units", "imperial".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let dto: CurrentWeatherDto =
            serde_json::from_str(&body).map_err(|e| WeatherError::Json {
                message: e.to_string(),
            })?;

        Weather::try_from(dto).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_and_blank_keys_are_unusable() {
        assert_eq!(usable_key(None), None);
        assert_eq!(usable_key(Some("   ".into())), None);
        assert_eq!(usable_key(Some(PLACEHOLDER_KEY.into())), None);
        assert_eq!(usable_key(Some(" abc123 ".into())), Some("abc123".into()));
    }

    #[tokio::test]
    async fn disabled_without_key() {
        let client = WeatherClient::new(WeatherConfig::new()).unwrap();
        assert!(!client.is_enabled().await);
        let weather = client
            .current_weather(Coord::new(42.36, -71.06))
            .await
            .unwrap();
        assert!(weather.is_none());
    }

    #[tokio::test]
    async fn key_can_be_swapped() {
        let client =
            WeatherClient::new(WeatherConfig::new().with_api_key(Some("abc".into()))).unwrap();
        assert!(client.is_enabled().await);

        client.set_api_key(Some(PLACEHOLDER_KEY.into())).await;
        assert!(!client.is_enabled().await);

        client.set_api_key(Some("def".into())).await;
        assert!(client.is_enabled().await);
    }

    #[test]
    fn config_builder() {
        let config = WeatherConfig::new().with_base_url("http://localhost:8080/data/2.5");
        assert_eq!(config.base_url, "http://localhost:8080/data/2.5");
        assert_eq!(config.timeout_secs, 10);
        assert!(config.api_key.is_none());
    }
}

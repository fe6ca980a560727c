//! Cached, retrying address resolution on top of a [`Geocoder`].

use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::{debug, info, warn};

use super::client::Geocoder;
use super::query::{Locality, candidate_queries};
use super::result::{GeocodeFailure, GeocodeResult};

/// Configuration for address resolution.
#[derive(Debug, Clone)]
pub struct GeocodeConfig {
    /// City and state appended to queries that name neither.
    pub locality: Locality,

    /// Attempts per candidate query.
    pub max_attempts: u32,

    /// Pause before retrying a timed-out query.
    pub retry_backoff: Duration,
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            locality: Locality::default(),
            max_attempts: 2,
            retry_backoff: Duration::from_secs(1),
        }
    }
}

/// Resolves addresses through a geocoder, caching results by input address.
///
/// The cache lives as long as the service and is never evicted.
pub struct GeocodeService<G> {
    geocoder: G,
    config: GeocodeConfig,
    cache: MokaCache<String, GeocodeResult>,
}

impl<G: Geocoder> GeocodeService<G> {
    pub fn new(geocoder: G, config: GeocodeConfig) -> Self {
        Self {
            geocoder,
            config,
            cache: MokaCache::builder().build(),
        }
    }

    /// Resolve an address.
    ///
    /// Never fails: an unresolvable address yields a result with
    /// `success == false`. Provider outages are not cached so a later
    /// call can succeed.
    pub async fn geocode(&self, address: &str) -> GeocodeResult {
        if let Some(hit) = self.cache.get(address).await {
            debug!(address, "geocode cache hit");
            return hit;
        }

        let result = self.resolve(address).await;
        if result.failure != Some(GeocodeFailure::ServiceUnavailable) {
            self.cache
                .insert(address.to_string(), result.clone())
                .await;
        }
        result
    }

    /// Seed the cache with a known location, e.g. a favorite's stored result.
    pub async fn remember(&self, address: &str, result: GeocodeResult) {
        self.cache.insert(address.to_string(), result).await;
    }

    async fn resolve(&self, address: &str) -> GeocodeResult {
        for query in candidate_queries(address, &self.config.locality) {
            for attempt in 1..=self.config.max_attempts {
                match self.geocoder.lookup(&query).await {
                    Ok(Some(place)) => {
                        info!(address, query, "geocoded address");
                        return GeocodeResult::found(address, place);
                    }
                    // No match is asked again, without the timeout backoff
                    Ok(None) => debug!(query, attempt, "no geocode match"),
                    Err(e) if e.is_retryable() => {
                        warn!(query, attempt, error = %e, "geocode attempt failed");
                        if attempt < self.config.max_attempts {
                            tokio::time::sleep(self.config.retry_backoff).await;
                        }
                    }
                    Err(e) => {
                        warn!(address, error = %e, "geocoding service error");
                        return GeocodeResult::failed(address, GeocodeFailure::ServiceUnavailable);
                    }
                }
            }
        }

        GeocodeResult::failed(address, GeocodeFailure::NotFound)
    }

    /// Number of cached addresses.
    pub fn cached_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

//! Shared inventory snapshot with on-demand refresh.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::warn;

use super::client::InventorySource;
use super::error::InventoryError;
use super::station::Inventory;

/// Thread-safe holder of the latest inventory snapshot.
///
/// Snapshots are replaced wholesale. A failed refresh leaves the previous
/// snapshot in place.
pub struct InventoryStore<S> {
    snapshot: Arc<RwLock<Option<Arc<Inventory>>>>,
    source: Arc<S>,
}

impl<S> Clone for InventoryStore<S> {
    fn clone(&self) -> Self {
        Self {
            snapshot: self.snapshot.clone(),
            source: self.source.clone(),
        }
    }
}

impl<S: InventorySource> InventoryStore<S> {
    /// Create an empty store. Nothing is fetched until the first refresh.
    pub fn new(source: S) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(None)),
            source: Arc::new(source),
        }
    }

    /// The current snapshot, if one has been fetched.
    pub async fn current(&self) -> Option<Arc<Inventory>> {
        self.snapshot.read().await.clone()
    }

    /// Fetch a new snapshot and replace the current one.
    ///
    /// On failure the existing snapshot is preserved and the error is
    /// returned.
    pub async fn refresh(&self) -> Result<Arc<Inventory>, InventoryError> {
        let fresh = Arc::new(self.source.fetch_inventory().await?);
        *self.snapshot.write().await = Some(fresh.clone());
        Ok(fresh)
    }

    /// The current snapshot, fetching one first if none exists yet.
    ///
    /// Returns `None` only if no snapshot exists and the fetch failed.
    pub async fn get_or_fetch(&self) -> Option<Arc<Inventory>> {
        if let Some(current) = self.current().await {
            return Some(current);
        }
        match self.refresh().await {
            Ok(fresh) => Some(fresh),
            Err(e) => {
                warn!(error = %e, "failed to fetch station inventory");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;
    use crate::geo::Coord;
    use crate::inventory::Station;

    /// Source that hands out queued results in order.
    struct QueuedSource {
        results: Mutex<Vec<Result<Inventory, InventoryError>>>,
    }

    impl QueuedSource {
        fn new(mut results: Vec<Result<Inventory, InventoryError>>) -> Self {
            results.reverse();
            Self {
                results: Mutex::new(results),
            }
        }
    }

    impl InventorySource for QueuedSource {
        async fn fetch_inventory(&self) -> Result<Inventory, InventoryError> {
            self.results
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Err(InventoryError::MissingFeed("station_information")))
        }
    }

    fn inventory(ids: &[&str]) -> Inventory {
        let stations = ids
            .iter()
            .map(|id| Station {
                station_id: id.to_string(),
                name: format!("Station {id}"),
                coord: Coord::new(42.36, -71.06),
                capacity: None,
                availability: None,
            })
            .collect();
        Inventory::new(stations, Utc::now())
    }

    #[tokio::test]
    async fn starts_empty() {
        let store = InventoryStore::new(QueuedSource::new(vec![]));
        assert!(store.current().await.is_none());
    }

    #[tokio::test]
    async fn refresh_replaces_snapshot() {
        let store = InventoryStore::new(QueuedSource::new(vec![
            Ok(inventory(&["a"])),
            Ok(inventory(&["a", "b"])),
        ]));

        store.refresh().await.unwrap();
        assert_eq!(store.current().await.unwrap().len(), 1);

        store.refresh().await.unwrap();
        assert_eq!(store.current().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_snapshot() {
        let store = InventoryStore::new(QueuedSource::new(vec![
            Ok(inventory(&["a", "b"])),
            Err(InventoryError::MissingFeed("station_status")),
        ]));

        store.refresh().await.unwrap();
        let err = store.refresh().await.unwrap_err();

        assert!(matches!(err, InventoryError::MissingFeed("station_status")));
        assert_eq!(store.current().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn get_or_fetch_only_fetches_once() {
        let store = InventoryStore::new(QueuedSource::new(vec![
            Ok(inventory(&["a"])),
            Ok(inventory(&["a", "b", "c"])),
        ]));

        assert_eq!(store.get_or_fetch().await.unwrap().len(), 1);
        assert_eq!(store.get_or_fetch().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn get_or_fetch_reports_failure_as_none() {
        let store = InventoryStore::new(QueuedSource::new(vec![]));
        assert!(store.get_or_fetch().await.is_none());
    }

    #[tokio::test]
    async fn clones_share_the_snapshot() {
        let store = InventoryStore::new(QueuedSource::new(vec![Ok(inventory(&["a"]))]));
        let other = store.clone();

        store.refresh().await.unwrap();
        assert!(other.current().await.is_some());
    }
}

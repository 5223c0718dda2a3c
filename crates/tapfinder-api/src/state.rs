use std::sync::Arc;
use std::time::Duration;

use tapfinder_core::cache::TtlCache;
use tapfinder_core::config::LayeredConfig;
use tapfinder_core::formats::load_datasets;
use tapfinder_core::geocoding::Geocoder;
use tapfinder_core::{GeoPoint, Result, TapfinderError};
use tokio::sync::RwLock;

const DATASETS_KEY: &str = "datasets";

pub struct AppState {
    pub config: LayeredConfig,
    pub geocoder: Arc<dyn Geocoder>,
    datasets: RwLock<TtlCache<&'static str, Arc<Vec<GeoPoint>>>>,
}

impl AppState {
    pub fn new(config: LayeredConfig, geocoder: Arc<dyn Geocoder>) -> Self {
        let ttl = Duration::from_secs(config.cache_ttl_secs.value);
        Self { config, geocoder, datasets: RwLock::new(TtlCache::new(ttl)) }
    }

    /// All configured points, loaded from disk when the cache is cold or expired.
    ///
    /// Files are read on the blocking pool with the cache lock released.
    pub async fn points(&self) -> Result<Arc<Vec<GeoPoint>>> {
        if let Some(points) = self.datasets.write().await.get(&DATASETS_KEY) {
            return Ok(points);
        }

        let specs = self.config.datasets.value.clone();
        let loaded = tokio::task::spawn_blocking(move || load_datasets(&specs))
            .await
            .map_err(|e| TapfinderError::Io(std::io::Error::other(e)))??;

        let mut cache = self.datasets.write().await;
        // a concurrent miss may have filled the cache first
        if let Some(points) = cache.get(&DATASETS_KEY) {
            return Ok(points);
        }

        let points = Arc::new(loaded);
        tracing::info!(count = points.len(), ttl_secs = cache.ttl().as_secs(), "Dataset cache refreshed");
        cache.insert(DATASETS_KEY, points.clone());
        Ok(points)
    }

    /// Drop cached datasets; returns whether anything was cached
    pub async fn invalidate_datasets(&self) -> bool {
        let mut cache = self.datasets.write().await;
        let had_entries = !cache.is_empty();
        cache.invalidate_all();
        had_entries
    }
}

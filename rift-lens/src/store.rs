//! Compute-once cache for loaded datasets.
//!
//! Parsing a season export is the only expensive step in the pipeline, so each
//! source is loaded at most once per store and shared as an immutable
//! `Arc<Dataset>`. [`DatasetStore::global`] is the process-wide store; separate
//! stores can be created where isolation matters (tests, embedding).
//!
//! Each key owns its own [`OnceCell`]. The map lock is only held long enough
//! to find or insert that cell, so a slow parse of one source never stalls
//! callers of another.

use crate::dataset::Dataset;
use crate::prelude::*;
use crate::sources::DataSource;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{OnceCell, RwLock};
use tracing::instrument;

type DatasetCell = Arc<OnceCell<Arc<Dataset>>>;
type DatasetCacheMap = HashMap<String, DatasetCell>;

static GLOBAL_STORE: Lazy<DatasetStore> = Lazy::new(DatasetStore::new);

/// Thread-safe cache of loaded datasets keyed by [`DataSource::cache_key`].
#[derive(Debug, Default)]
pub struct DatasetStore {
    cache: RwLock<DatasetCacheMap>,
    log_config: LogConfig,
}

impl DatasetStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with custom logging behavior.
    pub fn with_log_config(log_config: LogConfig) -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
            log_config,
        }
    }

    /// Returns the process-wide store, initializing it on first access.
    pub fn global() -> &'static DatasetStore {
        &GLOBAL_STORE
    }

    /// Loads `source`, or returns the dataset already loaded for it.
    ///
    /// Repeated calls with the same source return the same `Arc` without
    /// re-parsing, and concurrent first calls share one parse. A failed load
    /// is not cached, so a corrected file can be retried.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use rift_lens::sources::CsvSource;
    /// use rift_lens::store::DatasetStore;
    /// use std::sync::Arc;
    ///
    /// # async fn example() -> rift_lens::prelude::Result<()> {
    /// let source = CsvSource::new("LPL_regionalFinals_2024.csv");
    /// let first = DatasetStore::global().load(&source).await?;
    /// let second = DatasetStore::global().load(&source).await?;
    /// assert!(Arc::ptr_eq(&first, &second));
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self, source), fields(source = %source.description()))]
    pub async fn load(&self, source: &dyn DataSource) -> Result<Arc<Dataset>> {
        let key = source.cache_key();
        let cell = self.cell(&key).await;
        let key = key.as_str();

        if let Some(dataset) = cell.get() {
            crate::perf_debug!(self.log_config, key = %key, "Using cached dataset");
            return Ok(Arc::clone(dataset));
        }

        // Tasks arriving while the first one parses wait on the same cell
        let log_config = &self.log_config;
        let dataset = cell
            .get_or_try_init(|| async move {
                let dataset = Arc::new(source.load().await?);
                crate::log_data_op!(
                    log_config,
                    key = %key,
                    rows = dataset.len(),
                    columns = dataset.columns().len(),
                    "Dataset loaded"
                );
                Ok::<_, LensError>(dataset)
            })
            .await?;
        Ok(Arc::clone(dataset))
    }

    /// Finds or inserts the cell for `key`, holding the map lock only briefly.
    async fn cell(&self, key: &str) -> DatasetCell {
        if let Some(cell) = self.cache.read().await.get(key) {
            return Arc::clone(cell);
        }
        let mut cache = self.cache.write().await;
        Arc::clone(cache.entry(key.to_string()).or_default())
    }

    /// Returns the cached dataset for `key`, if any.
    pub async fn get(&self, key: &str) -> Option<Arc<Dataset>> {
        self.cache
            .read()
            .await
            .get(key)
            .and_then(|cell| cell.get().cloned())
    }

    /// Returns the number of cached datasets.
    pub async fn len(&self) -> usize {
        self.cache
            .read()
            .await
            .values()
            .filter(|cell| cell.initialized())
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Record;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    #[derive(Debug, Default)]
    struct CountingSource {
        loads: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl DataSource for CountingSource {
        async fn load(&self) -> Result<Dataset> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(LensError::data_load("counting", "boom"));
            }
            Ok(Dataset::from_records(vec![Record::builder("Tarzan").build()]))
        }

        fn cache_key(&self) -> String {
            "counting".to_string()
        }

        fn description(&self) -> String {
            "counting source".to_string()
        }
    }

    /// Blocks inside `load` until released.
    #[derive(Debug, Default)]
    struct GatedSource {
        started: Notify,
        release: Notify,
    }

    #[async_trait]
    impl DataSource for GatedSource {
        async fn load(&self) -> Result<Dataset> {
            self.started.notify_one();
            self.release.notified().await;
            Ok(Dataset::from_records(vec![Record::builder("Xiaohu").build()]))
        }

        fn cache_key(&self) -> String {
            "gated".to_string()
        }

        fn description(&self) -> String {
            "gated source".to_string()
        }
    }

    #[tokio::test]
    async fn test_loads_once() -> Result<()> {
        let store = DatasetStore::new();
        let source = CountingSource::default();

        let first = store.load(&source).await?;
        let second = store.load(&source).await?;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.loads.load(Ordering::SeqCst), 1);
        assert_eq!(store.len().await, 1);
        assert!(store.get("counting").await.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached() {
        let store = DatasetStore::new();
        let source = CountingSource {
            fail: true,
            ..Default::default()
        };

        assert!(store.load(&source).await.is_err());
        assert!(store.load(&source).await.is_err());
        assert_eq!(source.loads.load(Ordering::SeqCst), 2);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_concurrent_loads_share_one_parse() {
        let store = Arc::new(DatasetStore::new());
        let source = Arc::new(CountingSource::default());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let source = Arc::clone(&source);
                tokio::spawn(async move { store.load(source.as_ref()).await })
            })
            .collect();

        let mut datasets = Vec::new();
        for handle in handles {
            datasets.push(handle.await.unwrap().unwrap());
        }

        assert_eq!(source.loads.load(Ordering::SeqCst), 1);
        assert!(datasets.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[tokio::test]
    async fn test_slow_load_does_not_block_other_keys() -> Result<()> {
        let store = Arc::new(DatasetStore::new());
        let cached = CountingSource::default();
        store.load(&cached).await?;

        let gated = Arc::new(GatedSource::default());
        let pending = {
            let store = Arc::clone(&store);
            let gated = Arc::clone(&gated);
            tokio::spawn(async move { store.load(gated.as_ref()).await })
        };
        gated.started.notified().await;

        let again = tokio::time::timeout(Duration::from_secs(5), store.load(&cached))
            .await
            .expect("cached dataset is served while another source loads")?;
        assert_eq!(again.len(), 1);
        assert_eq!(store.len().await, 1);
        assert!(store.get("gated").await.is_none());

        gated.release.notify_one();
        pending.await.unwrap()?;
        assert_eq!(store.len().await, 2);
        assert_eq!(cached.loads.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[test]
    fn test_global_store_is_a_singleton() {
        assert!(std::ptr::eq(DatasetStore::global(), DatasetStore::global()));
    }
}

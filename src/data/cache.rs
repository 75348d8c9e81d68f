//! Cache-aside store for raw fallback datasets.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::debug;

use super::datasets::{BundledDatasets, DatasetId, DatasetLoader};
use super::error::DataError;

/// Holds each fallback dataset after its first successful load.
///
/// Only the unfiltered collection is stored; callers apply their own query
/// to a copy. Failed loads are not remembered, so the next call retries.
pub struct DatasetCache {
  loader: Box<dyn DatasetLoader>,
  entries: Mutex<HashMap<DatasetId, Arc<Value>>>,
}

impl DatasetCache {
  pub fn new(loader: impl DatasetLoader + 'static) -> Self {
    Self {
      loader: Box::new(loader),
      entries: Mutex::new(HashMap::new()),
    }
  }

  /// Cache backed by the datasets compiled into the binary.
  pub fn bundled() -> Self {
    Self::new(BundledDatasets)
  }

  /// Look up a dataset by fallback identifier, loading it on first use.
  pub fn load(&self, fallback_id: &str) -> Result<Arc<Value>, DataError> {
    let dataset = DatasetId::parse(fallback_id)?;
    self.load_dataset(dataset)
  }

  pub fn load_dataset(&self, dataset: DatasetId) -> Result<Arc<Value>, DataError> {
    if let Some(cached) = self.lock().get(&dataset) {
      debug!(%dataset, "fallback dataset served from cache");
      return Ok(Arc::clone(cached));
    }

    // The lock is released while loading; concurrent first loads both load
    // and the last insert wins.
    let raw = self.loader.load(dataset)?;
    let value: Value =
      serde_json::from_str(&raw).map_err(|source| DataError::MalformedDataset {
        dataset: dataset.name().to_string(),
        source,
      })?;
    let value = Arc::new(value);

    self.lock().insert(dataset, Arc::clone(&value));
    debug!(%dataset, "fallback dataset loaded");
    Ok(value)
  }

  /// Whether a dataset is currently cached.
  pub fn contains(&self, dataset: DatasetId) -> bool {
    self.lock().contains_key(&dataset)
  }

  fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<DatasetId, Arc<Value>>> {
    // A panic while holding the lock cannot leave the map half-written.
    self.entries.lock().unwrap_or_else(|e| e.into_inner())
  }
}

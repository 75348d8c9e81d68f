//! Remote-first data access with transparent fallback to bundled datasets.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;

use super::cache::DatasetCache;
use super::datasets::{BundledDatasets, DirectoryDatasets};
use super::error::DataError;
use super::remote::{DisabledRemote, HttpRemote, RemoteSource};
use super::strategy::{
  FallbackOnly, RemoteThenFallback, ResolutionStrategy, Resolved, ResolveContext,
};

/// Resolves logical endpoints against the remote API or the bundled
/// fallback datasets.
///
/// The fetcher owns its dataset cache, so independent fetchers (one per
/// test, for example) never share loaded datasets.
#[derive(Clone)]
pub struct ResilientFetcher {
  remote: Arc<dyn RemoteSource>,
  datasets: Arc<DatasetCache>,
  strategy: Arc<dyn ResolutionStrategy>,
  timeout: Duration,
}

impl ResilientFetcher {
  pub fn new(
    remote: impl RemoteSource + 'static,
    datasets: DatasetCache,
    strategy: impl ResolutionStrategy + 'static,
    timeout: Duration,
  ) -> Self {
    Self {
      remote: Arc::new(remote),
      datasets: Arc::new(datasets),
      strategy: Arc::new(strategy),
      timeout,
    }
  }

  /// Build a fetcher from configuration.
  ///
  /// With remote access disabled no HTTP client is created and every request
  /// is served from the fallback datasets.
  pub fn from_config(config: &Config) -> Result<Self, DataError> {
    let datasets = match &config.data_dir {
      Some(dir) => DatasetCache::new(DirectoryDatasets::new(dir)),
      None => DatasetCache::new(BundledDatasets),
    };
    let timeout = config.api.timeout();

    let fetcher = if config.api.use_api {
      Self::new(HttpRemote::new(&config.api)?, datasets, RemoteThenFallback, timeout)
    } else {
      Self::new(DisabledRemote, datasets, FallbackOnly, timeout)
    };
    debug!(strategy = fetcher.strategy.name(), "data fetcher ready");
    Ok(fetcher)
  }

  /// Replace the resolution strategy.
  pub fn with_strategy(mut self, strategy: impl ResolutionStrategy + 'static) -> Self {
    self.strategy = Arc::new(strategy);
    self
  }

  pub fn strategy_name(&self) -> &'static str {
    self.strategy.name()
  }

  /// Resolve a logical endpoint to its raw JSON collection.
  pub async fn resolve(
    &self,
    endpoint: &str,
    fallback_id: &str,
  ) -> Result<Resolved<Value>, DataError> {
    let ctx = ResolveContext {
      remote: self.remote.as_ref(),
      datasets: &self.datasets,
      timeout: self.timeout,
    };
    self.strategy.resolve(&ctx, endpoint, fallback_id).await
  }

  /// Resolve and decode into domain types.
  pub async fn resolve_as<T: DeserializeOwned>(
    &self,
    endpoint: &str,
    fallback_id: &str,
  ) -> Result<Resolved<T>, DataError> {
    let resolved = self.resolve(endpoint, fallback_id).await?;
    let origin = resolved.source;
    let data = serde_json::from_value(resolved.data).map_err(|source| DataError::Decode {
      endpoint: endpoint.to_string(),
      source,
    })?;
    Ok(Resolved {
      data,
      source: origin,
    })
  }
}

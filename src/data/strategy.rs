//! Policies for combining the remote source with the bundled fallback.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use crate::query::{self, QueryDescriptor};

use super::cache::DatasetCache;
use super::datasets::DatasetId;
use super::error::DataError;
use super::remote::RemoteSource;

/// Where resolved data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
  /// Fresh response from the remote API
  Remote,
  /// Bundled dataset, filtered locally
  Fallback,
}

/// Resolved data together with its source.
#[derive(Debug, Clone)]
pub struct Resolved<T> {
  pub data: T,
  pub source: Source,
}

impl<T> Resolved<T> {
  pub fn remote(data: T) -> Self {
    Self {
      data,
      source: Source::Remote,
    }
  }

  pub fn fallback(data: T) -> Self {
    Self {
      data,
      source: Source::Fallback,
    }
  }

  pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolved<U> {
    Resolved {
      data: f(self.data),
      source: self.source,
    }
  }
}

/// Everything a strategy may use to satisfy a request.
pub struct ResolveContext<'a> {
  pub remote: &'a dyn RemoteSource,
  pub datasets: &'a DatasetCache,
  pub timeout: Duration,
}

impl ResolveContext<'_> {
  /// One remote attempt, bounded by the configured timeout.
  pub async fn fetch_remote(&self, endpoint: &str) -> Result<Value, DataError> {
    match tokio::time::timeout(self.timeout, self.remote.get(endpoint)).await {
      Ok(result) => result,
      Err(_) => Err(DataError::Timeout {
        endpoint: endpoint.to_string(),
        after: self.timeout,
      }),
    }
  }

  /// Serve the request from the bundled dataset, emulating the remote
  /// API's filtering and sorting.
  pub fn fetch_fallback(&self, endpoint: &str, fallback_id: &str) -> Result<Value, DataError> {
    let dataset = DatasetId::parse(fallback_id)?;
    let raw = self.datasets.load_dataset(dataset)?;

    if !dataset.supports_query() {
      return Ok(raw.as_ref().clone());
    }
    let query = QueryDescriptor::from_endpoint(endpoint);
    Ok(query::apply(&raw, &query))
  }
}

/// How remote and fallback resolution are combined for a request.
#[async_trait]
pub trait ResolutionStrategy: Send + Sync {
  fn name(&self) -> &'static str;

  async fn resolve(
    &self,
    ctx: &ResolveContext<'_>,
    endpoint: &str,
    fallback_id: &str,
  ) -> Result<Resolved<Value>, DataError>;
}

/// Try the remote API; on any failure serve the bundled dataset instead.
pub struct RemoteThenFallback;

#[async_trait]
impl ResolutionStrategy for RemoteThenFallback {
  fn name(&self) -> &'static str {
    "remote-then-fallback"
  }

  async fn resolve(
    &self,
    ctx: &ResolveContext<'_>,
    endpoint: &str,
    fallback_id: &str,
  ) -> Result<Resolved<Value>, DataError> {
    match ctx.fetch_remote(endpoint).await {
      Ok(data) => Ok(Resolved::remote(data)),
      Err(e) => {
        warn!(endpoint, error = %e, "remote request failed, falling back to local data");
        let data = ctx
          .fetch_fallback(endpoint, fallback_id)
          .map_err(|e| DataError::unavailable(endpoint, e))?;
        info!(endpoint, fallback_id, "using fallback data");
        Ok(Resolved::fallback(data))
      }
    }
  }
}

/// Serve everything from the bundled datasets without touching the network.
pub struct FallbackOnly;

#[async_trait]
impl ResolutionStrategy for FallbackOnly {
  fn name(&self) -> &'static str {
    "fallback-only"
  }

  async fn resolve(
    &self,
    ctx: &ResolveContext<'_>,
    endpoint: &str,
    fallback_id: &str,
  ) -> Result<Resolved<Value>, DataError> {
    info!(endpoint, fallback_id, "remote access disabled, using fallback data");
    ctx
      .fetch_fallback(endpoint, fallback_id)
      .map(Resolved::fallback)
      .map_err(|e| DataError::unavailable(endpoint, e))
  }
}

/// Remote only; failures are reported to the caller.
pub struct RemoteOnly;

#[async_trait]
impl ResolutionStrategy for RemoteOnly {
  fn name(&self) -> &'static str {
    "remote-only"
  }

  async fn resolve(
    &self,
    ctx: &ResolveContext<'_>,
    endpoint: &str,
    _fallback_id: &str,
  ) -> Result<Resolved<Value>, DataError> {
    ctx.fetch_remote(endpoint).await.map(Resolved::remote)
  }
}

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors produced by the data-access layer.
///
/// The default resolution strategy recovers from any remote failure by
/// falling back to the bundled datasets; only a failed fallback is reported
/// as [`DataError::Unavailable`].
#[derive(Debug, Error)]
pub enum DataError {
  #[error("unknown fallback dataset '{0}'")]
  UnknownDataset(String),

  #[error("failed to read dataset file {}: {source}", path.display())]
  DatasetIo {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("dataset '{dataset}' is not valid JSON: {source}")]
  MalformedDataset {
    dataset: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("request to {endpoint} timed out after {}ms", after.as_millis())]
  Timeout { endpoint: String, after: Duration },

  #[error("request to {endpoint} failed with status {status}")]
  Status { endpoint: String, status: u16 },

  #[error("request to {endpoint} failed: {message}")]
  Transport { endpoint: String, message: String },

  #[error("failed to decode response for {endpoint}: {source}")]
  Decode {
    endpoint: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("data unavailable for {endpoint}")]
  Unavailable {
    endpoint: String,
    #[source]
    source: Box<DataError>,
  },
}

impl DataError {
  /// Whether neither the remote source nor the fallback could serve the request.
  pub fn is_unavailable(&self) -> bool {
    matches!(self, DataError::Unavailable { .. })
  }

  pub(crate) fn unavailable(endpoint: &str, source: DataError) -> Self {
    DataError::Unavailable {
      endpoint: endpoint.to_string(),
      source: Box::new(source),
    }
  }
}

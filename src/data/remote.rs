use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::ApiConfig;

use super::error::DataError;

/// A remote source of JSON collections.
#[async_trait]
pub trait RemoteSource: Send + Sync {
  /// GET a logical endpoint (path plus query string) and decode the body.
  async fn get(&self, endpoint: &str) -> Result<Value, DataError>;
}

/// HTTP client for the storefront API.
#[derive(Clone)]
pub struct HttpRemote {
  client: reqwest::Client,
  base_url: String,
  timeout: Duration,
}

impl HttpRemote {
  pub fn new(config: &ApiConfig) -> Result<Self, DataError> {
    let timeout = config.timeout();
    let client = reqwest::Client::builder()
      .timeout(timeout)
      .build()
      .map_err(|e| DataError::Transport {
        endpoint: config.base_url.clone(),
        message: format!("failed to build HTTP client: {}", e),
      })?;

    Ok(Self {
      client,
      base_url: config.base_url.trim_end_matches('/').to_string(),
      timeout,
    })
  }

  fn url(&self, endpoint: &str) -> String {
    if endpoint.starts_with('/') {
      format!("{}{}", self.base_url, endpoint)
    } else {
      format!("{}/{}", self.base_url, endpoint)
    }
  }

  fn map_error(&self, endpoint: &str, e: reqwest::Error) -> DataError {
    if e.is_timeout() {
      DataError::Timeout {
        endpoint: endpoint.to_string(),
        after: self.timeout,
      }
    } else if let Some(status) = e.status() {
      DataError::Status {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
      }
    } else {
      DataError::Transport {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
      }
    }
  }
}

#[async_trait]
impl RemoteSource for HttpRemote {
  async fn get(&self, endpoint: &str) -> Result<Value, DataError> {
    let response = self
      .client
      .get(self.url(endpoint))
      .send()
      .await
      .and_then(|r| r.error_for_status())
      .map_err(|e| self.map_error(endpoint, e))?;

    // A body that is not JSON counts as a failed remote attempt.
    response
      .json::<Value>()
      .await
      .map_err(|e| self.map_error(endpoint, e))
  }
}

/// Remote source used when remote access is disabled. Every call fails.
pub struct DisabledRemote;

#[async_trait]
impl RemoteSource for DisabledRemote {
  async fn get(&self, endpoint: &str) -> Result<Value, DataError> {
    Err(DataError::Transport {
      endpoint: endpoint.to_string(),
      message: "remote access is disabled".to_string(),
    })
  }
}

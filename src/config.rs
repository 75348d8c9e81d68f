use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub api: ApiConfig,
  /// Directory holding `honey.json`, `blog.json`, ... that replace the
  /// bundled fallback datasets
  pub data_dir: Option<PathBuf>,
  #[serde(default)]
  pub cart: CartConfig,
  #[serde(default)]
  pub shipping: ShippingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  /// When false every request is served from the fallback datasets
  #[serde(default)]
  pub use_api: bool,
  #[serde(default = "default_base_url")]
  pub base_url: String,
  /// Remote request timeout in milliseconds
  #[serde(default = "default_timeout_ms")]
  pub timeout_ms: u64,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      use_api: false,
      base_url: default_base_url(),
      timeout_ms: default_timeout_ms(),
    }
  }
}

impl ApiConfig {
  pub fn timeout(&self) -> Duration {
    Duration::from_millis(self.timeout_ms)
  }
}

fn default_base_url() -> String {
  "http://localhost:3000".to_string()
}

fn default_timeout_ms() -> u64 {
  5000
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CartConfig {
  /// SQLite database holding the persisted cart (default: $XDG_DATA_HOME/apiary/cart.db)
  pub database: Option<PathBuf>,
}

impl CartConfig {
  pub fn database_path(&self) -> Result<PathBuf> {
    if let Some(path) = &self.database {
      return Ok(path.clone());
    }

    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("apiary").join("cart.db"))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ShippingConfig {
  /// Subtotal at or above which shipping is free
  #[serde(default = "default_free_threshold")]
  pub free_threshold: u64,
  /// Shipping charged below the threshold
  #[serde(default = "default_flat_rate")]
  pub flat_rate: u64,
}

impl Default for ShippingConfig {
  fn default() -> Self {
    Self {
      free_threshold: default_free_threshold(),
      flat_rate: default_flat_rate(),
    }
  }
}

fn default_free_threshold() -> u64 {
  2000
}

fn default_flat_rate() -> u64 {
  150
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./apiary.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/apiary/config.yaml
  ///
  /// Without a config file the built-in defaults apply. `APIARY_USE_API`
  /// overrides `api.use_api` either way.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let mut config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => {
        debug!("no config file found, using defaults");
        Self::default()
      }
    };

    if let Some(use_api) = Self::use_api_from_env()? {
      config.api.use_api = use_api;
    }

    Ok(config)
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("apiary.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("apiary").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::from_yaml(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn from_yaml(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
    // An empty file deserializes to null rather than an empty mapping.
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    serde_yaml::from_str(contents)
  }

  /// Read the `APIARY_USE_API` override.
  fn use_api_from_env() -> Result<Option<bool>> {
    match std::env::var("APIARY_USE_API") {
      Ok(value) => parse_switch(&value)
        .map(Some)
        .ok_or_else(|| eyre!("APIARY_USE_API must be true/false/1/0, got '{}'", value)),
      Err(_) => Ok(None),
    }
  }
}

fn parse_switch(value: &str) -> Option<bool> {
  match value.trim().to_lowercase().as_str() {
    "1" | "true" | "yes" | "on" => Some(true),
    "0" | "false" | "no" | "off" => Some(false),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let config = Config::default();
    assert!(!config.api.use_api);
    assert_eq!(config.api.base_url, "http://localhost:3000");
    assert_eq!(config.api.timeout(), Duration::from_millis(5000));
    assert_eq!(config.shipping, ShippingConfig { free_threshold: 2000, flat_rate: 150 });
    assert!(config.data_dir.is_none());
  }

  #[test]
  fn test_partial_yaml_fills_defaults() {
    let config = Config::from_yaml(
      "api:\n  use_api: true\n  timeout_ms: 250\nshipping:\n  flat_rate: 200\n",
    )
    .unwrap();
    assert!(config.api.use_api);
    assert_eq!(config.api.timeout_ms, 250);
    assert_eq!(config.api.base_url, "http://localhost:3000");
    assert_eq!(config.shipping.flat_rate, 200);
    assert_eq!(config.shipping.free_threshold, 2000);
  }

  #[test]
  fn test_empty_file_is_default() {
    let config = Config::from_yaml("  \n").unwrap();
    assert!(!config.api.use_api);
  }

  #[test]
  fn test_load_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("apiary.yaml");
    std::fs::write(&path, "data_dir: /srv/apiary\ncart:\n  database: /tmp/cart.db\n").unwrap();

    let config = Config::load_from_path(&path).unwrap();
    assert_eq!(config.data_dir, Some(PathBuf::from("/srv/apiary")));
    assert_eq!(
      config.cart.database_path().unwrap(),
      PathBuf::from("/tmp/cart.db")
    );
  }

  #[test]
  fn test_missing_explicit_path_is_error() {
    let err = Config::load(Some(Path::new("/definitely/not/here.yaml"))).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
  }

  #[test]
  fn test_parse_switch() {
    assert_eq!(parse_switch("TRUE"), Some(true));
    assert_eq!(parse_switch("0"), Some(false));
    assert_eq!(parse_switch("maybe"), None);
  }
}

//! Bundled fallback datasets and the loaders that read them.

use std::fmt;
use std::path::PathBuf;

use super::error::DataError;

/// A logical resource that has a bundled fallback collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetId {
  /// Product catalog
  Honey,
  Blog,
  Health,
  Order,
}

impl DatasetId {
  pub const ALL: [DatasetId; 4] = [
    DatasetId::Honey,
    DatasetId::Blog,
    DatasetId::Health,
    DatasetId::Order,
  ];

  /// Parse a fallback identifier. Accepts the bare name, a few aliases, and
  /// the bundled file name (`honey.json`).
  pub fn parse(fallback_id: &str) -> Result<Self, DataError> {
    let name = fallback_id.trim();
    let name = name.strip_suffix(".json").unwrap_or(name);
    match name.to_lowercase().as_str() {
      "honey" | "catalog" | "products" => Ok(DatasetId::Honey),
      "blog" => Ok(DatasetId::Blog),
      "health" => Ok(DatasetId::Health),
      "order" | "orders" => Ok(DatasetId::Order),
      _ => Err(DataError::UnknownDataset(fallback_id.to_string())),
    }
  }

  pub fn name(self) -> &'static str {
    match self {
      DatasetId::Honey => "honey",
      DatasetId::Blog => "blog",
      DatasetId::Health => "health",
      DatasetId::Order => "order",
    }
  }

  pub fn file_name(self) -> &'static str {
    match self {
      DatasetId::Honey => "honey.json",
      DatasetId::Blog => "blog.json",
      DatasetId::Health => "health.json",
      DatasetId::Order => "order.json",
    }
  }

  /// Remote endpoint that serves the same resource.
  pub fn endpoint(self) -> &'static str {
    match self {
      DatasetId::Honey => "/api/honey",
      DatasetId::Blog => "/api/blog",
      DatasetId::Health => "/api/health",
      DatasetId::Order => "/api/order",
    }
  }

  /// Only the catalog carries category and price fields the query emulator
  /// understands; other datasets pass through unfiltered.
  pub fn supports_query(self) -> bool {
    matches!(self, DatasetId::Honey)
  }
}

impl fmt::Display for DatasetId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Source of raw dataset text.
pub trait DatasetLoader: Send + Sync {
  fn load(&self, dataset: DatasetId) -> Result<String, DataError>;
}

/// Datasets compiled into the binary.
pub struct BundledDatasets;

impl DatasetLoader for BundledDatasets {
  fn load(&self, dataset: DatasetId) -> Result<String, DataError> {
    let raw = match dataset {
      DatasetId::Honey => include_str!("../../data/honey.json"),
      DatasetId::Blog => include_str!("../../data/blog.json"),
      DatasetId::Health => include_str!("../../data/health.json"),
      DatasetId::Order => include_str!("../../data/order.json"),
    };
    Ok(raw.to_string())
  }
}

/// Datasets read from a directory on disk (`<dir>/honey.json`, ...).
pub struct DirectoryDatasets {
  dir: PathBuf,
}

impl DirectoryDatasets {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }
}

impl DatasetLoader for DirectoryDatasets {
  fn load(&self, dataset: DatasetId) -> Result<String, DataError> {
    let path = self.dir.join(dataset.file_name());
    std::fs::read_to_string(&path).map_err(|source| DataError::DatasetIo { path, source })
  }
}

//! Storefront data access.
//!
//! Requests are resolved against the remote API first and, when it is
//! disabled or unreachable, against datasets bundled with the binary:
//! - `fetcher` runs the request through a pluggable resolution strategy
//! - `cache` keeps each raw bundled dataset after its first load
//! - `crate::query` reproduces the API's filtering and sorting locally
//! - `catalog` wraps it all in typed per-resource calls

mod cache;
mod catalog;
mod datasets;
mod error;
mod fetcher;
mod remote;
mod strategy;
pub mod types;

pub use cache::DatasetCache;
pub use catalog::{ArticleKind, Catalog};
pub use datasets::{BundledDatasets, DatasetId, DatasetLoader, DirectoryDatasets};
pub use error::DataError;
pub use fetcher::ResilientFetcher;
pub use remote::{DisabledRemote, HttpRemote, RemoteSource};
pub use strategy::{
  FallbackOnly, RemoteOnly, RemoteThenFallback, ResolutionStrategy, ResolveContext, Resolved,
  Source,
};

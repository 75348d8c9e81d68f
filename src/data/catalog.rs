//! Typed access to the storefront resources.

use std::str::FromStr;

use super::datasets::DatasetId;
use super::error::DataError;
use super::fetcher::ResilientFetcher;
use super::strategy::Resolved;
use super::types::{Article, Order, Product};
use crate::query::QueryDescriptor;

/// Article collections served by the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleKind {
  Blog,
  Health,
}

impl FromStr for ArticleKind {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "blog" => Ok(ArticleKind::Blog),
      "health" => Ok(ArticleKind::Health),
      other => Err(format!("unknown article collection '{}' (expected blog or health)", other)),
    }
  }
}

impl ArticleKind {
  fn dataset(self) -> DatasetId {
    match self {
      ArticleKind::Blog => DatasetId::Blog,
      ArticleKind::Health => DatasetId::Health,
    }
  }
}

/// Storefront resources resolved through a [`ResilientFetcher`].
///
/// Provides the same data regardless of whether the remote API is reachable.
#[derive(Clone)]
pub struct Catalog {
  fetcher: ResilientFetcher,
}

impl Catalog {
  pub fn new(fetcher: ResilientFetcher) -> Self {
    Self { fetcher }
  }

  /// List products, filtered and sorted per `query`.
  pub async fn products(&self, query: &QueryDescriptor) -> Result<Resolved<Vec<Product>>, DataError> {
    let dataset = DatasetId::Honey;
    let endpoint = format!("{}{}", dataset.endpoint(), query.to_query_string());
    self.fetcher.resolve_as(&endpoint, dataset.name()).await
  }

  /// Find a product by its URL slug.
  pub async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>, DataError> {
    let products = self.products(&QueryDescriptor::new()).await?;
    Ok(products.data.into_iter().find(|p| p.slug() == slug))
  }

  /// Find a product by slug, falling back to its identifier.
  pub async fn product(&self, slug_or_id: &str) -> Result<Option<Product>, DataError> {
    let products = self.products(&QueryDescriptor::new()).await?;
    Ok(
      products
        .data
        .into_iter()
        .find(|p| p.slug() == slug_or_id || p.id == slug_or_id),
    )
  }

  /// List articles that have not been deleted.
  pub async fn articles(&self, kind: ArticleKind) -> Result<Resolved<Vec<Article>>, DataError> {
    let dataset = kind.dataset();
    let resolved = self
      .fetcher
      .resolve_as::<Vec<Article>>(dataset.endpoint(), dataset.name())
      .await?;
    Ok(resolved.map(|articles| {
      articles
        .into_iter()
        .filter(|a| a.deleted_at.is_none())
        .collect()
    }))
  }

  /// Look up an order by its identifier.
  pub async fn order(&self, id: &str) -> Result<Option<Order>, DataError> {
    let dataset = DatasetId::Order;
    let orders = self
      .fetcher
      .resolve_as::<Vec<Order>>(dataset.endpoint(), dataset.name())
      .await?;
    Ok(orders.data.into_iter().find(|o| o.id == id))
  }
}

//! Query descriptors and the in-memory query emulator.
//!
//! The remote API filters and sorts collections itself, driven by the
//! `category`, `sortBy` and `order` query parameters of the endpoint. When a
//! request is served from a bundled dataset instead, [`apply`] reproduces the
//! same semantics locally so callers cannot tell the two paths apart.
//!
//! # Example
//!
//! ```ignore
//! let query = QueryDescriptor::from_endpoint("/api/honey?category=pollen&sortBy=price&order=desc");
//! let endpoint = format!("/api/honey{}", query.to_query_string());
//! let filtered = query::apply(&catalog, &query);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::collate;

/// Field a collection can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
  Name,
  Price,
}

impl SortKey {
  pub fn as_str(self) -> &'static str {
    match self {
      SortKey::Name => "name",
      SortKey::Price => "price",
    }
  }
}

impl FromStr for SortKey {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "name" => Ok(SortKey::Name),
      "price" => Ok(SortKey::Price),
      other => Err(format!("unsupported sort key '{}'", other)),
    }
  }
}

impl fmt::Display for SortKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
  #[default]
  Asc,
  Desc,
}

impl SortOrder {
  pub fn as_str(self) -> &'static str {
    match self {
      SortOrder::Asc => "asc",
      SortOrder::Desc => "desc",
    }
  }

  fn apply(self, ordering: Ordering) -> Ordering {
    match self {
      SortOrder::Asc => ordering,
      SortOrder::Desc => ordering.reverse(),
    }
  }
}

impl FromStr for SortOrder {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "asc" => Ok(SortOrder::Asc),
      "desc" => Ok(SortOrder::Desc),
      other => Err(format!("unsupported sort order '{}'", other)),
    }
  }
}

/// Filter and sort parameters for a collection request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryDescriptor {
  pub category: Option<String>,
  pub sort_by: Option<SortKey>,
  pub order: SortOrder,
}

impl QueryDescriptor {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn category(mut self, category: impl Into<String>) -> Self {
    self.category = Some(category.into());
    self
  }

  pub fn sort_by(mut self, key: SortKey, order: SortOrder) -> Self {
    self.sort_by = Some(key);
    self.order = order;
    self
  }

  pub fn is_empty(&self) -> bool {
    self.category.is_none() && self.sort_by.is_none()
  }

  /// Decode the descriptor from an endpoint's query string.
  ///
  /// Unknown `sortBy` values are ignored. A missing or empty `order` means
  /// ascending; any other value than `asc` means descending.
  pub fn from_endpoint(endpoint: &str) -> Self {
    let url = match Url::parse("http://localhost/").and_then(|base| base.join(endpoint)) {
      Ok(url) => url,
      Err(e) => {
        debug!(endpoint, error = %e, "endpoint is not a valid URL; no query applied");
        return Self::default();
      }
    };

    let mut query = Self::default();
    for (key, value) in url.query_pairs() {
      match key.as_ref() {
        "category" if !value.is_empty() => query.category = Some(value.into_owned()),
        "sortBy" if !value.is_empty() => match value.parse() {
          Ok(sort_by) => query.sort_by = Some(sort_by),
          Err(e) => debug!(endpoint, "{}", e),
        },
        "order" => query.order = order_param(&value),
        _ => {}
      }
    }
    query
  }

  /// Encode as a query string (`?category=..&sortBy=..&order=..`), or an
  /// empty string when there is nothing to encode.
  pub fn to_query_string(&self) -> String {
    if self.is_empty() {
      return String::new();
    }

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    if let Some(category) = &self.category {
      serializer.append_pair("category", category);
    }
    if let Some(sort_by) = self.sort_by {
      serializer.append_pair("sortBy", sort_by.as_str());
      serializer.append_pair("order", self.order.as_str());
    }
    format!("?{}", serializer.finish())
  }
}

fn order_param(value: &str) -> SortOrder {
  match value {
    "" | "asc" => SortOrder::Asc,
    _ => SortOrder::Desc,
  }
}

/// Apply a query descriptor to a JSON collection.
///
/// Non-array values are returned unchanged. The input is never modified; the
/// result is a filtered and sorted copy. Sorting is stable, and records that
/// lack the sort field are placed after those that have it.
pub fn apply(collection: &Value, query: &QueryDescriptor) -> Value {
  let Some(records) = collection.as_array() else {
    return collection.clone();
  };

  let mut result: Vec<Value> = match &query.category {
    Some(category) => records
      .iter()
      .filter(|record| record.get("category").and_then(Value::as_str) == Some(category.as_str()))
      .cloned()
      .collect(),
    None => records.clone(),
  };

  if let Some(sort_by) = query.sort_by {
    result.sort_by(|a, b| compare_records(a, b, sort_by, query.order));
  }

  Value::Array(result)
}

fn compare_records(a: &Value, b: &Value, key: SortKey, order: SortOrder) -> Ordering {
  let field = key.as_str();
  match key {
    SortKey::Price => {
      let a = a.get(field).and_then(Value::as_f64);
      let b = b.get(field).and_then(Value::as_f64);
      present_first(a, b, |a, b| order.apply(a.total_cmp(&b)))
    }
    SortKey::Name => {
      let a = a.get(field).and_then(Value::as_str);
      let b = b.get(field).and_then(Value::as_str);
      present_first(a, b, |a, b| order.apply(collate::compare(a, b)))
    }
  }
}

fn present_first<T>(a: Option<T>, b: Option<T>, cmp: impl FnOnce(T, T) -> Ordering) -> Ordering {
  match (a, b) {
    (Some(a), Some(b)) => cmp(a, b),
    (Some(_), None) => Ordering::Less,
    (None, Some(_)) => Ordering::Greater,
    (None, None) => Ordering::Equal,
  }
}

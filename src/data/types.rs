use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Catalog product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub id: String,
  pub name: String,
  /// Unit price in whole currency units (denars)
  pub price: u64,
  /// Discount percentage, 0-100
  #[serde(default)]
  pub discount: u8,
  #[serde(default)]
  pub stock: u32,
  pub category: String,
  #[serde(default)]
  pub image: String,
  /// Net weight in grams
  #[serde(default)]
  pub weight: Option<u32>,
  /// Descriptive fields (flowers, aroma, consumption notes, ...)
  #[serde(flatten)]
  pub attributes: Map<String, Value>,
}

impl Product {
  /// URL slug derived from the display name.
  pub fn slug(&self) -> String {
    slugify(&self.name)
  }
}

/// Lowercase, hyphenate whitespace, and keep only lowercase Cyrillic
/// (U+0430..=U+045F), ASCII digits and hyphens. Runs of hyphens collapse.
/// Latin letters are dropped, so storefront URLs use Cyrillic slugs only.
pub fn slugify(name: &str) -> String {
  let mut slug = String::with_capacity(name.len());
  for c in name.to_lowercase().chars() {
    let c = if c.is_whitespace() { '-' } else { c };
    let keep = c == '-' || c.is_ascii_digit() || ('\u{430}'..='\u{45F}').contains(&c);
    if !keep || (c == '-' && slug.ends_with('-')) {
      continue;
    }
    slug.push(c);
  }
  slug
}

/// Blog post or health article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
  pub id: String,
  pub title: String,
  pub header: Option<String>,
  #[serde(default)]
  pub main_image: String,
  pub slug: String,
  #[serde(default)]
  pub content: Vec<ArticleSection>,
  pub created_at: String,
  pub deleted_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSection {
  pub content_header: Option<String>,
  #[serde(default)]
  pub items: Vec<ContentItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
  #[serde(rename = "type")]
  pub kind: ContentKind,
  /// A paragraph string, an image path, or a list of either
  pub content: Value,
  pub item_header: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
  Paragraph,
  Image,
}

/// Placed order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  pub id: String,
  pub order_id: u64,
  pub first_name: String,
  pub last_name: String,
  pub address: String,
  pub city: String,
  #[serde(default)]
  pub municipality: String,
  pub postal_code: u32,
  pub phone_number: u64,
  pub email: String,
  pub cart: OrderCart,
  /// Whether the order has been fulfilled
  pub status: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCart {
  pub items: Vec<OrderItem>,
  pub price_summary: OrderPriceSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
  pub id: String,
  pub name: String,
  pub quantity: u32,
  /// Unit price after discount
  pub price: u64,
  #[serde(default)]
  pub discount: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPriceSummary {
  pub subtotal: u64,
  pub shipping: u64,
  pub total: u64,
}

use serde::{Deserialize, Serialize};

use crate::data::types::Product;

/// Product fields copied onto a cart line so the cart renders without
/// re-fetching the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
  pub name: String,
  #[serde(default)]
  pub image: String,
  pub price: u64,
  #[serde(default)]
  pub discount: u8,
  /// Stock observed when the line was last written; unknown for carts
  /// saved without it
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub stock: Option<u32>,
}

impl From<&Product> for ProductSnapshot {
  fn from(product: &Product) -> Self {
    Self {
      name: product.name.clone(),
      image: product.image.clone(),
      price: product.price,
      discount: product.discount,
      stock: Some(product.stock),
    }
  }
}

/// One product's entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
  /// Older carts stored the whole product, keyed by `id`.
  #[serde(alias = "id")]
  pub product_id: String,
  pub quantity: u32,
  #[serde(flatten)]
  pub snapshot: ProductSnapshot,
}

impl CartLine {
  pub fn new(product: &Product, quantity: u32) -> Self {
    Self {
      product_id: product.id.clone(),
      quantity,
      snapshot: ProductSnapshot::from(product),
    }
  }

  /// Unit price after discount, rounded half up to whole currency units.
  pub fn unit_price(&self) -> u64 {
    let discount = u64::from(self.snapshot.discount.min(100));
    self
      .snapshot
      .price
      .saturating_mul(100 - discount)
      .saturating_add(50)
      / 100
  }

  pub fn line_total(&self) -> u64 {
    self.unit_price().saturating_mul(u64::from(self.quantity))
  }
}

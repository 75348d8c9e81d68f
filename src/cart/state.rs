//! Cart state machine. Pure: no storage, no logging.

use crate::config::ShippingConfig;
use crate::data::types::Product;

use super::line::{CartLine, ProductSnapshot};
use super::pricing::PriceSummary;

/// Ordered cart lines, at most one per product.
///
/// Every line has a quantity of at least 1 and no more than the stock last
/// observed for its product. Mutators return whether the state changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
  lines: Vec<CartLine>,
}

impl CartState {
  pub fn new() -> Self {
    Self::default()
  }

  /// Build a state from previously persisted lines.
  ///
  /// Quantities are cut to the recorded stock when one is known. Entries
  /// left with no quantity, and repeats of a product, are dropped.
  pub fn from_lines(lines: Vec<CartLine>) -> Self {
    let mut state = Self::new();
    for mut line in lines {
      if let Some(stock) = line.snapshot.stock {
        line.quantity = line.quantity.min(stock);
      }
      if line.quantity == 0 || state.position(&line.product_id).is_some() {
        continue;
      }
      state.lines.push(line);
    }
    state
  }

  pub fn items(&self) -> &[CartLine] {
    &self.lines
  }

  pub fn get(&self, product_id: &str) -> Option<&CartLine> {
    self.lines.iter().find(|l| l.product_id == product_id)
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  /// Sum of all line quantities.
  pub fn total_items(&self) -> u64 {
    self.lines.iter().map(|l| u64::from(l.quantity)).sum()
  }

  /// Number of distinct products.
  pub fn total_unique_products(&self) -> usize {
    self.lines.len()
  }

  pub fn price_summary(&self, shipping: &ShippingConfig) -> PriceSummary {
    PriceSummary::calculate(&self.lines, shipping)
  }

  /// Add `requested` units of `product`, capped at its current stock.
  ///
  /// An existing line is only raised, never lowered by the request itself;
  /// but when the product's stock has dropped below the line's quantity the
  /// line is cut to the new stock (and removed at zero). The product snapshot
  /// is refreshed on any line that remains.
  pub fn add(&mut self, product: &Product, requested: u32) -> bool {
    let ceiling = product.stock;

    let Some(index) = self.position(&product.id) else {
      let quantity = requested.min(ceiling);
      if quantity == 0 {
        return false;
      }
      self.lines.push(CartLine::new(product, quantity));
      return true;
    };

    if ceiling == 0 {
      self.lines.remove(index);
      return true;
    }

    let line = &mut self.lines[index];
    let before = line.clone();

    let candidate = line.quantity.saturating_add(requested).min(ceiling);
    if candidate > line.quantity {
      line.quantity = candidate;
    } else if line.quantity > ceiling {
      line.quantity = ceiling;
    }
    line.snapshot = ProductSnapshot::from(product);

    *line != before
  }

  /// Lower a line's quantity by one, removing it at zero.
  pub fn decrease(&mut self, product_id: &str) -> bool {
    let Some(index) = self.position(product_id) else {
      return false;
    };

    let line = &mut self.lines[index];
    line.quantity -= 1;
    if line.quantity == 0 {
      self.lines.remove(index);
    }
    true
  }

  /// Remove a line regardless of its quantity.
  pub fn remove(&mut self, product_id: &str) -> bool {
    let before = self.lines.len();
    self.lines.retain(|l| l.product_id != product_id);
    self.lines.len() != before
  }

  pub fn clear(&mut self) -> bool {
    let changed = !self.lines.is_empty();
    self.lines.clear();
    changed
  }

  fn position(&self, product_id: &str) -> Option<usize> {
    self.lines.iter().position(|l| l.product_id == product_id)
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;

  pub(crate) fn product(id: &str, stock: u32) -> Product {
    Product {
      id: id.to_string(),
      name: format!("Product {}", id),
      price: 400,
      discount: 0,
      stock,
      category: "honey".to_string(),
      image: format!("/images/{}.jpg", id),
      weight: Some(500),
      attributes: Default::default(),
    }
  }

  fn quantities(state: &CartState) -> Vec<(&str, u32)> {
    state
      .items()
      .iter()
      .map(|l| (l.product_id.as_str(), l.quantity))
      .collect()
  }

  #[test]
  fn test_add_caps_at_stock() {
    let a = product("A", 3);
    let mut state = CartState::new();

    assert!(state.add(&a, 2));
    assert_eq!(state.get("A").unwrap().quantity, 2);

    assert!(state.add(&a, 2));
    assert_eq!(state.get("A").unwrap().quantity, 3);

    // Already at the ceiling
    assert!(!state.add(&a, 1));
    assert_eq!(state.get("A").unwrap().quantity, 3);
  }

  #[test]
  fn test_add_out_of_stock_is_noop() {
    let mut state = CartState::new();
    assert!(!state.add(&product("B", 0), 1));
    assert!(state.is_empty());
  }

  #[test]
  fn test_add_zero_quantity_is_noop() {
    let mut state = CartState::new();
    assert!(!state.add(&product("A", 5), 0));
    assert!(state.is_empty());
  }

  #[test]
  fn test_first_add_larger_than_stock() {
    let mut state = CartState::new();
    state.add(&product("A", 2), 10);
    assert_eq!(quantities(&state), vec![("A", 2)]);
  }

  #[test]
  fn test_shrunken_stock_cuts_line() {
    let mut state = CartState::new();
    state.add(&product("A", 5), 4);

    assert!(state.add(&product("A", 2), 1));
    assert_eq!(state.get("A").unwrap().quantity, 2);
    assert_eq!(state.get("A").unwrap().snapshot.stock, Some(2));

    assert!(state.add(&product("A", 0), 1));
    assert!(state.get("A").is_none());
  }

  #[test]
  fn test_add_refreshes_snapshot() {
    let mut state = CartState::new();
    state.add(&product("A", 3), 3);

    let mut repriced = product("A", 3);
    repriced.price = 380;
    repriced.discount = 5;

    // Quantity is already at the ceiling, only the snapshot changes.
    assert!(state.add(&repriced, 1));
    let line = state.get("A").unwrap();
    assert_eq!(line.quantity, 3);
    assert_eq!(line.snapshot.price, 380);
    assert_eq!(line.snapshot.discount, 5);
  }

  #[test]
  fn test_quantity_never_exceeds_observed_stock() {
    let stocks = [3, 5, 1, 4, 0, 2, 6, 2];
    let requests = [2, 3, 1, 7, 1, 1, 9, 0];
    let mut state = CartState::new();

    for (stock, requested) in stocks.iter().zip(requests) {
      state.add(&product("A", *stock), requested);
      if let Some(line) = state.get("A") {
        assert!(line.quantity <= *stock);
        assert!(line.quantity >= 1);
      }
    }
  }

  #[test]
  fn test_decrease_to_zero_removes_line() {
    let mut state = CartState::new();
    state.add(&product("A", 5), 3);

    for _ in 0..3 {
      assert!(state.decrease("A"));
    }
    assert!(state.get("A").is_none());
    assert!(!state.decrease("A"));
  }

  #[test]
  fn test_decrease_removes_single_line() {
    let mut state = CartState::new();
    state.add(&product("A", 5), 2);
    state.add(&product("B", 5), 1);

    state.decrease("B");

    assert_eq!(quantities(&state), vec![("A", 2)]);
    assert_eq!(state.total_items(), 2);
    assert_eq!(state.total_unique_products(), 1);
  }

  #[test]
  fn test_remove_and_clear() {
    let mut state = CartState::new();
    state.add(&product("A", 5), 2);
    state.add(&product("B", 5), 4);
    state.add(&product("C", 5), 1);

    assert!(state.remove("B"));
    assert!(!state.remove("B"));
    assert_eq!(quantities(&state), vec![("A", 2), ("C", 1)]);

    assert!(state.clear());
    assert!(state.items().is_empty());
    assert!(!state.clear());
  }

  #[test]
  fn test_insertion_order_kept() {
    let mut state = CartState::new();
    state.add(&product("C", 5), 1);
    state.add(&product("A", 5), 1);
    state.add(&product("C", 5), 1);
    assert_eq!(quantities(&state), vec![("C", 2), ("A", 1)]);
  }

  #[test]
  fn test_from_lines_drops_invalid_entries() {
    let mut zero = CartLine::new(&product("Z", 5), 1);
    zero.quantity = 0;
    let lines = vec![
      CartLine::new(&product("A", 5), 2),
      zero,
      CartLine::new(&product("A", 5), 4),
      CartLine::new(&product("B", 5), 1),
    ];

    let state = CartState::from_lines(lines);
    assert_eq!(quantities(&state), vec![("A", 2), ("B", 1)]);
  }

  #[test]
  fn test_from_lines_caps_at_recorded_stock() {
    let mut over = CartLine::new(&product("A", 3), 1);
    over.quantity = 9;
    let mut sold_out = CartLine::new(&product("B", 0), 1);
    sold_out.quantity = 2;
    let mut unknown = CartLine::new(&product("C", 1), 1);
    unknown.snapshot.stock = None;
    unknown.quantity = 4;

    let state = CartState::from_lines(vec![over, sold_out, unknown]);
    assert_eq!(quantities(&state), vec![("A", 3), ("C", 4)]);
  }

  #[test]
  fn test_totals_do_not_overflow() {
    let mut a = CartLine::new(&product("A", 1), 1);
    a.snapshot.stock = None;
    a.quantity = 4_000_000_000;
    let mut b = a.clone();
    b.product_id = "B".into();

    let state = CartState::from_lines(vec![a, b]);
    assert_eq!(state.total_items(), 8_000_000_000);
    let summary = state.price_summary(&ShippingConfig::default());
    assert_eq!(summary.subtotal, 3_200_000_000_000);
  }
}

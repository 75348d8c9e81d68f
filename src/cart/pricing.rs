use serde::Serialize;

use crate::config::ShippingConfig;

use super::line::CartLine;

/// Cart totals in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSummary {
  /// Sum of discounted line totals
  pub subtotal: u64,
  pub shipping: u64,
  pub total: u64,
  /// How much more must be spent to qualify for free shipping
  pub remaining_for_free_shipping: u64,
}

impl PriceSummary {
  pub fn calculate(lines: &[CartLine], policy: &ShippingConfig) -> Self {
    let subtotal = lines
      .iter()
      .map(CartLine::line_total)
      .fold(0u64, u64::saturating_add);
    let shipping = if lines.is_empty() || subtotal >= policy.free_threshold {
      0
    } else {
      policy.flat_rate
    };

    Self {
      subtotal,
      shipping,
      total: subtotal.saturating_add(shipping),
      remaining_for_free_shipping: policy.free_threshold.saturating_sub(subtotal),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cart::state::tests::product;
  use crate::cart::state::CartState;

  #[test]
  fn test_below_threshold_pays_shipping() {
    let mut state = CartState::new();
    let mut honey = product("A", 10);
    honey.price = 450;
    honey.discount = 10;
    state.add(&honey, 2);

    let summary = state.price_summary(&ShippingConfig::default());
    assert_eq!(
      summary,
      PriceSummary {
        subtotal: 810,
        shipping: 150,
        total: 960,
        remaining_for_free_shipping: 1190,
      }
    );
  }

  #[test]
  fn test_threshold_reached_ships_free() {
    let mut state = CartState::new();
    state.add(&product("A", 10), 5); // 5 x 400

    let summary = state.price_summary(&ShippingConfig::default());
    assert_eq!(summary.subtotal, 2000);
    assert_eq!(summary.shipping, 0);
    assert_eq!(summary.total, 2000);
    assert_eq!(summary.remaining_for_free_shipping, 0);
  }

  #[test]
  fn test_empty_cart_has_no_shipping() {
    let summary = CartState::new().price_summary(&ShippingConfig::default());
    assert_eq!(summary.total, 0);
    assert_eq!(summary.shipping, 0);
    assert_eq!(summary.remaining_for_free_shipping, 2000);
  }

  #[test]
  fn test_custom_policy() {
    let mut state = CartState::new();
    state.add(&product("A", 10), 1);

    let policy = ShippingConfig {
      free_threshold: 300,
      flat_rate: 99,
    };
    assert_eq!(state.price_summary(&policy).shipping, 0);
  }
}

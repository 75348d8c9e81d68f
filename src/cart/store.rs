use tracing::{debug, warn};

use crate::config::ShippingConfig;
use crate::data::types::Product;

use super::line::CartLine;
use super::persist;
use super::pricing::PriceSummary;
use super::state::CartState;
use super::storage::CartStorage;

/// Callback run after every transition that changed the cart.
pub type ChangeHook = Box<dyn FnMut(&CartState) + Send>;

/// The session cart.
///
/// Wraps a [`CartState`] and runs an on-change hook after each state-changing
/// operation. Operations never fail: out-of-stock adds, missing lines and
/// storage errors all leave the in-memory cart as the source of truth.
pub struct CartStore {
  state: CartState,
  on_change: ChangeHook,
}

impl CartStore {
  /// Restore the cart from `storage` and persist every later change to it.
  ///
  /// A stored cart that cannot be read or parsed is discarded and the
  /// session starts empty.
  pub fn initialize(storage: impl CartStorage + 'static) -> Self {
    let state = restore(&storage);
    Self::with_hook(state, persist_to(storage))
  }

  /// Cart with a custom on-change hook.
  pub fn with_hook(state: CartState, on_change: impl FnMut(&CartState) + Send + 'static) -> Self {
    Self {
      state,
      on_change: Box::new(on_change),
    }
  }

  /// Cart that is never persisted.
  pub fn detached() -> Self {
    Self::with_hook(CartState::new(), |_| {})
  }

  pub fn state(&self) -> &CartState {
    &self.state
  }

  pub fn items(&self) -> &[CartLine] {
    self.state.items()
  }

  pub fn total_items(&self) -> u64 {
    self.state.total_items()
  }

  pub fn total_unique_products(&self) -> usize {
    self.state.total_unique_products()
  }

  pub fn price_summary(&self, shipping: &ShippingConfig) -> PriceSummary {
    self.state.price_summary(shipping)
  }

  pub fn add(&mut self, product: &Product, quantity: u32) {
    let changed = self.state.add(product, quantity);
    if !changed {
      debug!(product_id = %product.id, quantity, stock = product.stock, "add left cart unchanged");
    }
    self.commit(changed);
  }

  pub fn decrease(&mut self, product_id: &str) {
    let changed = self.state.decrease(product_id);
    self.commit(changed);
  }

  pub fn remove(&mut self, product_id: &str) {
    let changed = self.state.remove(product_id);
    self.commit(changed);
  }

  pub fn clear(&mut self) {
    let changed = self.state.clear();
    self.commit(changed);
  }

  fn commit(&mut self, changed: bool) {
    if changed {
      (self.on_change)(&self.state);
    }
  }
}

fn restore(storage: &dyn CartStorage) -> CartState {
  let payload = match storage.load() {
    Ok(Some(payload)) => payload,
    Ok(None) => return CartState::new(),
    Err(e) => {
      warn!(error = %e, "failed to read stored cart, starting empty");
      return CartState::new();
    }
  };

  match persist::decode(&payload) {
    Ok(state) => {
      debug!(lines = state.total_unique_products(), "restored cart");
      state
    }
    Err(e) => {
      warn!(error = %e, "stored cart is corrupted, discarding it");
      if let Err(e) = storage.discard() {
        warn!(error = %e, "failed to discard corrupted cart");
      }
      CartState::new()
    }
  }
}

/// Hook that writes the whole cart to `storage`, logging failures.
fn persist_to(storage: impl CartStorage + 'static) -> impl FnMut(&CartState) + Send + 'static {
  move |state: &CartState| {
    let result = persist::encode(state).and_then(|payload| storage.save(&payload));
    if let Err(e) = result {
      warn!(error = %e, "failed to persist cart");
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cart::state::tests::product;
  use crate::cart::storage::{MemoryStorage, SqliteStorage};
  use color_eyre::{eyre::eyre, Result};
  use std::sync::{Arc, Mutex};

  /// Storage whose writes always fail.
  struct BrokenStorage;

  impl CartStorage for BrokenStorage {
    fn load(&self) -> Result<Option<String>> {
      Ok(None)
    }

    fn save(&self, _payload: &str) -> Result<()> {
      Err(eyre!("disk full"))
    }

    fn discard(&self) -> Result<()> {
      Err(eyre!("disk full"))
    }
  }

  #[test]
  fn test_initialize_from_empty_storage() {
    let cart = CartStore::initialize(MemoryStorage::new());
    assert!(cart.items().is_empty());
    assert_eq!(cart.total_items(), 0);
  }

  #[test]
  fn test_round_trip_through_storage() {
    let storage = MemoryStorage::new();
    let mut cart = CartStore::initialize(storage.clone());
    cart.add(&product("A", 3), 2);
    cart.add(&product("B", 1), 5);

    let restored = CartStore::initialize(storage);
    assert_eq!(restored.items(), cart.items());
    assert_eq!(restored.total_items(), 3);
  }

  #[test]
  fn test_round_trip_through_sqlite_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cart.db");

    let mut cart = CartStore::initialize(SqliteStorage::open(&path).unwrap());
    cart.add(&product("A", 4), 4);
    cart.decrease("A");
    let expected = cart.items().to_vec();
    drop(cart);

    let restored = CartStore::initialize(SqliteStorage::open(&path).unwrap());
    assert_eq!(restored.items(), expected.as_slice());
  }

  #[test]
  fn test_corrupted_storage_starts_empty_and_is_discarded() {
    let storage = MemoryStorage::with_payload("{{ definitely not json");

    let cart = CartStore::initialize(storage.clone());

    assert!(cart.items().is_empty());
    assert_eq!(storage.load().unwrap(), None);
  }

  #[test]
  fn test_legacy_storage_is_restored() {
    let storage = MemoryStorage::with_payload(
      r#"[{"id":"h1","name":"Мед","price":450,"stock":4,"discount":0,"image":"","quantity":3}]"#,
    );
    let cart = CartStore::initialize(storage);
    assert_eq!(cart.total_items(), 3);
  }

  #[test]
  fn test_persist_failure_keeps_memory_state() {
    let mut cart = CartStore::initialize(BrokenStorage);
    cart.add(&product("A", 5), 2);
    cart.add(&product("A", 5), 1);
    assert_eq!(cart.total_items(), 3);
  }

  #[test]
  fn test_hook_runs_only_on_change() {
    let calls = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&calls);
    let mut cart = CartStore::with_hook(CartState::new(), move |_| {
      *counter.lock().unwrap() += 1;
    });

    cart.add(&product("B", 0), 1); // out of stock
    cart.decrease("missing");
    cart.remove("missing");
    cart.clear();
    assert_eq!(*calls.lock().unwrap(), 0);

    cart.add(&product("A", 3), 1);
    cart.decrease("A");
    assert_eq!(*calls.lock().unwrap(), 2);
  }

  #[test]
  fn test_scenario_decrease_single_line() {
    let mut cart = CartStore::detached();
    cart.add(&product("A", 5), 2);
    cart.add(&product("B", 5), 1);

    cart.decrease("B");

    let ids: Vec<_> = cart.items().iter().map(|l| (l.product_id.as_str(), l.quantity)).collect();
    assert_eq!(ids, vec![("A", 2)]);
    assert_eq!(cart.total_items(), 2);
    assert_eq!(cart.total_unique_products(), 1);
  }

  #[test]
  fn test_clear_empties_and_persists() {
    let storage = MemoryStorage::new();
    let mut cart = CartStore::initialize(storage.clone());
    cart.add(&product("A", 5), 2);
    cart.clear();

    assert!(cart.items().is_empty());
    assert!(CartStore::initialize(storage).items().is_empty());
  }
}

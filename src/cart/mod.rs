//! Shopping cart: stock-capped quantities, derived totals, and persistence
//! that survives restarts and corrupted storage.

mod line;
mod persist;
mod pricing;
mod state;
mod storage;
mod store;

pub use line::{CartLine, ProductSnapshot};
pub use persist::FORMAT_VERSION;
pub use pricing::PriceSummary;
pub use state::CartState;
pub use storage::{CartStorage, MemoryStorage, SqliteStorage, CART_KEY};
pub use store::{CartStore, ChangeHook};

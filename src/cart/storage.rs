//! Durable storage backends for the cart.

use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Key the serialized cart is stored under.
pub const CART_KEY: &str = "cart";

/// Trait for key-value storage holding the serialized cart.
pub trait CartStorage: Send {
  /// Read the stored payload, if any.
  fn load(&self) -> Result<Option<String>>;

  /// Replace the stored payload.
  fn save(&self, payload: &str) -> Result<()>;

  /// Delete the stored payload.
  fn discard(&self) -> Result<()>;
}

/// In-memory storage. Clones share the same slot, so a test can keep a
/// handle while the store owns another.
#[derive(Clone, Default)]
pub struct MemoryStorage {
  slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_payload(payload: impl Into<String>) -> Self {
    Self {
      slot: Arc::new(Mutex::new(Some(payload.into()))),
    }
  }
}

impl CartStorage for MemoryStorage {
  fn load(&self) -> Result<Option<String>> {
    let slot = self.slot.lock().map_err(|e| eyre!("Lock poisoned: {}", e))?;
    Ok(slot.clone())
  }

  fn save(&self, payload: &str) -> Result<()> {
    let mut slot = self.slot.lock().map_err(|e| eyre!("Lock poisoned: {}", e))?;
    *slot = Some(payload.to_string());
    Ok(())
  }

  fn discard(&self) -> Result<()> {
    let mut slot = self.slot.lock().map_err(|e| eyre!("Lock poisoned: {}", e))?;
    *slot = None;
    Ok(())
  }
}

/// SQLite-based cart storage.
pub struct SqliteStorage {
  conn: Mutex<Connection>,
}

impl SqliteStorage {
  /// Open (or create) the cart database at `path`.
  pub fn open(path: &Path) -> Result<Self> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create cart directory: {}", e))?;
    }

    let conn = Connection::open(path)
      .map_err(|e| eyre!("Failed to open cart database at {}: {}", path.display(), e))?;

    Self::with_connection(conn)
  }

  /// Storage that lives only as long as this value.
  pub fn in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory()
      .map_err(|e| eyre!("Failed to open in-memory database: {}", e))?;
    Self::with_connection(conn)
  }

  fn with_connection(conn: Connection) -> Result<Self> {
    let storage = Self {
      conn: Mutex::new(conn),
    };
    storage.run_migrations()?;
    Ok(storage)
  }

  /// Run database migrations for the storage table.
  fn run_migrations(&self) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute_batch(STORAGE_SCHEMA)
      .map_err(|e| eyre!("Failed to run storage migrations: {}", e))?;

    Ok(())
  }
}

const STORAGE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

impl CartStorage for SqliteStorage {
  fn load(&self) -> Result<Option<String>> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .query_row(
        "SELECT value FROM kv_store WHERE key = ?",
        params![CART_KEY],
        |row| row.get(0),
      )
      .optional()
      .map_err(|e| eyre!("Failed to read stored cart: {}", e))
  }

  fn save(&self, payload: &str) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute(
        "INSERT OR REPLACE INTO kv_store (key, value, updated_at)
         VALUES (?, ?, datetime('now'))",
        params![CART_KEY, payload],
      )
      .map_err(|e| eyre!("Failed to store cart: {}", e))?;

    Ok(())
  }

  fn discard(&self) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute("DELETE FROM kv_store WHERE key = ?", params![CART_KEY])
      .map_err(|e| eyre!("Failed to delete stored cart: {}", e))?;

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn exercise(storage: &dyn CartStorage) {
    assert_eq!(storage.load().unwrap(), None);

    storage.save("[1]").unwrap();
    storage.save("[2]").unwrap();
    assert_eq!(storage.load().unwrap().as_deref(), Some("[2]"));

    storage.discard().unwrap();
    assert_eq!(storage.load().unwrap(), None);
  }

  #[test]
  fn test_memory_storage() {
    exercise(&MemoryStorage::new());
  }

  #[test]
  fn test_memory_clones_share_slot() {
    let storage = MemoryStorage::new();
    let handle = storage.clone();
    storage.save("[]").unwrap();
    assert_eq!(handle.load().unwrap().as_deref(), Some("[]"));
  }

  #[test]
  fn test_sqlite_storage() {
    exercise(&SqliteStorage::in_memory().unwrap());
  }

  #[test]
  fn test_sqlite_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("cart.db");

    SqliteStorage::open(&path).unwrap().save("[\"kept\"]").unwrap();

    let reopened = SqliteStorage::open(&path).unwrap();
    assert_eq!(reopened.load().unwrap().as_deref(), Some("[\"kept\"]"));
  }
}

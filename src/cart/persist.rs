//! Serialized cart format.
//!
//! Current layout:
//! `{"version":1,"savedAt":"2026-01-01T00:00:00Z","lines":[{"productId":..,"quantity":..,...}]}`
//!
//! Carts written before versioning are a bare array of product objects with
//! an added `quantity`; they are still read.

use chrono::{DateTime, Utc};
use color_eyre::{eyre::eyre, Result};
use serde::{Deserialize, Serialize};

use super::line::CartLine;
use super::state::CartState;

pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
  version: u32,
  saved_at: DateTime<Utc>,
  lines: &'a [CartLine],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Persisted {
  Versioned { version: u32, lines: Vec<CartLine> },
  Legacy(Vec<CartLine>),
}

pub fn encode(state: &CartState) -> Result<String> {
  let envelope = Envelope {
    version: FORMAT_VERSION,
    saved_at: Utc::now(),
    lines: state.items(),
  };
  serde_json::to_string(&envelope).map_err(|e| eyre!("Failed to serialize cart: {}", e))
}

pub fn decode(payload: &str) -> Result<CartState> {
  let persisted: Persisted =
    serde_json::from_str(payload).map_err(|e| eyre!("Failed to parse stored cart: {}", e))?;

  let lines = match persisted {
    Persisted::Versioned { version, lines } if version == FORMAT_VERSION => lines,
    Persisted::Versioned { version, .. } => {
      return Err(eyre!("Unsupported stored cart version {}", version));
    }
    Persisted::Legacy(lines) => lines,
  };
  Ok(CartState::from_lines(lines))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cart::state::tests::product;

  #[test]
  fn test_encode_then_decode_keeps_lines() {
    let mut state = CartState::new();
    state.add(&product("A", 3), 2);
    state.add(&product("B", 9), 4);

    let payload = encode(&state).unwrap();
    assert!(payload.contains("\"version\":1"));
    assert_eq!(decode(&payload).unwrap(), state);
  }

  #[test]
  fn test_decode_legacy_array() {
    let payload = r#"[
      {"id":"h1","name":"Багремов мед","price":450,"stock":3,"category":"honey",
       "weight":500,"discount":10,"flowers":"Багрем","image":"/img/h1.jpg","quantity":2}
    ]"#;

    let state = decode(payload).unwrap();
    let line = state.get("h1").unwrap();
    assert_eq!(line.quantity, 2);
    assert_eq!(line.snapshot.price, 450);
    assert_eq!(line.snapshot.discount, 10);
    assert_eq!(line.snapshot.stock, Some(3));
  }

  #[test]
  fn test_decode_cuts_quantity_to_recorded_stock() {
    let payload = r#"[
      {"id":"h1","name":"Багремов мед","price":450,"stock":3,"category":"honey","quantity":9},
      {"id":"h2","name":"Липов мед","price":500,"category":"honey","quantity":2}
    ]"#;

    let state = decode(payload).unwrap();
    assert_eq!(state.get("h1").unwrap().quantity, 3);
    let unknown = state.get("h2").unwrap();
    assert_eq!(unknown.quantity, 2);
    assert_eq!(unknown.snapshot.stock, None);
  }

  #[test]
  fn test_decode_rejects_garbage() {
    assert!(decode("not json at all").is_err());
    assert!(decode(r#"{"lines": "nope"}"#).is_err());
    assert!(decode(r#"[{"quantity": 1}]"#).is_err());
  }

  #[test]
  fn test_decode_rejects_unknown_version() {
    let err = decode(r#"{"version":2,"lines":[]}"#).unwrap_err();
    assert!(err.to_string().contains("version 2"));
  }
}

//! Storefront client core.
//!
//! Two pieces: [`data`] resolves catalog and content requests against the
//! remote API with a transparent fallback to bundled datasets, and [`cart`]
//! keeps a stock-capped, persisted shopping cart.

pub mod cart;
pub mod collate;
pub mod config;
pub mod data;
pub mod logging;
pub mod query;

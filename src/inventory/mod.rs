//! Inventory Module
//!
//! Item storage with concurrency-safe mutators plus the HTTP handlers.

pub mod api;
pub mod models;
pub mod store;

pub use models::{NewSweet, SearchFilter, Sweet, SweetPatch};
pub use store::{PurchaseOutcome, StoreError, SweetStore};

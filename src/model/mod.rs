//! Dashboard data model.
//!
//! Plain data only: rows of items with parallel column-width arrays. All
//! changes go through the mutator, which produces new values.

mod core;

pub use self::core::{DashboardConfig, ExtraFields, Fingerprint, Item, ItemId, Row, RowId};

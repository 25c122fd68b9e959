//! Column size balancing for dashboard rows.

mod core;

pub use self::core::{RebalancePolicy, balance, insert_preserving, resize_for_insert};

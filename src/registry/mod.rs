//! Change tracking between successive dashboard configs.

mod core;

pub use self::core::{RowState, TileRegistry};

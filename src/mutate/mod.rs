//! Layout mutation operations.
//!
//! [`LayoutMutator`] owns the grid width and policies; its operations are
//! pure functions of the config they receive. [`Mutation`] expresses the same
//! operations as data for batching.

mod batch;
mod config;
mod core;


pub use self::batch::Mutation;
pub use self::config::{
    DEFAULT_COLUMNS, DEFAULT_LOG_TARGET, DEFAULT_METRICS_TARGET, MutatorConfig,
};
pub use self::core::{LayoutMutator, MoveTarget};

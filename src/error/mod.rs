//! Error module orchestrator.
//!
//! Every fallible operation in the crate returns [`Result`] with a
//! [`GridError`]; the definitions live in the private `types` module.

mod types;

pub use types::{GridError, Result};

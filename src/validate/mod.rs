//! Structural invariant checks for dashboard layouts.
//!
//! The mutator runs the [`Validator`] after every operation while the gate is
//! enabled; a failure there is an engine defect, never a user error.

mod core;

pub use self::core::{Validator, Violation};

//! Dashboard grid layout engine.
//!
//! Arranges visualization tiles into rows of resizable columns and keeps the
//! grid structurally valid while tiles are added, removed, moved or resized.
//! Every operation takes a [`DashboardConfig`] and returns a new one; callers
//! own persistence and rendering.
//!
//! ```
//! use std::collections::HashSet;
//! use dashboard_grid::{DashboardConfig, Item, LayoutMutator, Row};
//!
//! let mutator = LayoutMutator::with_columns(12)?;
//! let config = DashboardConfig::new(vec![Row::new(
//!     "row-1",
//!     vec![Item::new("a"), Item::new("b"), Item::new("c")],
//!     vec![4, 4, 4],
//! )]);
//!
//! let removed: HashSet<String> = HashSet::from(["b".to_string()]);
//! let config = mutator.remove_items(&removed, &config)?;
//! assert_eq!(config.rows[0].column_sizes, vec![6, 6]);
//! # Ok::<(), dashboard_grid::GridError>(())
//! ```

pub mod audit;
pub mod balance;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod mutate;
pub mod registry;
pub mod validate;

pub use audit::{
    MutationAudit, MutationAuditEvent, MutationAuditEventBuilder, MutationKind, NullMutationAudit,
};
pub use balance::{RebalancePolicy, balance};
pub use error::{GridError, Result};
pub use geometry::{Rect, Size};
pub use layout::{GridMetrics, TilePlacement, item_at, solve};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
};
pub use metrics::{MetricSnapshot, MutationMetrics};
pub use model::{DashboardConfig, Fingerprint, Item, ItemId, Row, RowId};
pub use mutate::{DEFAULT_COLUMNS, LayoutMutator, MoveTarget, Mutation, MutatorConfig};
pub use registry::{RowState, TileRegistry};
pub use validate::{Validator, Violation};

use thiserror::Error;

use crate::model::{ItemId, RowId};
use crate::validate::Violation;

/// Unified result type for the dashboard grid crate.
pub type Result<T> = std::result::Result<T, GridError>;

/// Errors surfaced by the grid layout engine.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("cannot balance {count} columns across {columns} grid units")]
    InvalidColumnCount { count: usize, columns: u32 },
    #[error("row `{0}` not found")]
    RowNotFound(RowId),
    #[error("item `{0}` not found")]
    ItemNotFound(ItemId),
    #[error("item `{0}` already exists in the dashboard")]
    DuplicateItemId(ItemId),
    #[error("boundary {boundary} is not an interior boundary of row `{row_id}` ({items} items)")]
    BoundaryOutOfRange {
        row_id: RowId,
        boundary: usize,
        items: usize,
    },
    #[error("row index {index} out of range ({len} rows)")]
    RowIndexOutOfRange { index: usize, len: usize },
    #[error("grid invariant violated: {0}")]
    InvariantViolation(#[from] Violation),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl GridError {
    /// Message safe to show to an end user, or `None` when the error is an
    /// internal defect that should only be logged.
    pub fn user_message(&self) -> Option<String> {
        match self {
            GridError::InvalidColumnCount { .. } => {
                Some("That row has no room for another tile.".to_string())
            }
            GridError::RowNotFound(_) => Some("That row no longer exists.".to_string()),
            GridError::ItemNotFound(_) => Some("That item no longer exists.".to_string()),
            GridError::DuplicateItemId(_) => {
                Some("That item is already on this dashboard.".to_string())
            }
            GridError::BoundaryOutOfRange { .. } | GridError::RowIndexOutOfRange { .. } => {
                Some("That position is no longer available.".to_string())
            }
            GridError::Serde(_) => Some("The dashboard layout could not be read.".to_string()),
            GridError::InvariantViolation(_) => None,
        }
    }

    /// Short machine-friendly label used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GridError::InvalidColumnCount { .. } => "invalid_column_count",
            GridError::RowNotFound(_) => "row_not_found",
            GridError::ItemNotFound(_) => "item_not_found",
            GridError::DuplicateItemId(_) => "duplicate_item_id",
            GridError::BoundaryOutOfRange { .. } => "boundary_out_of_range",
            GridError::RowIndexOutOfRange { .. } => "row_index_out_of_range",
            GridError::InvariantViolation(_) => "invariant_violation",
            GridError::Serde(_) => "serde",
        }
    }
}

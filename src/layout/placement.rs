use crate::geometry::{Rect, Size};
use crate::model::{DashboardConfig, ItemId, RowId};

/// Viewport parameters used to project grid units onto cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridMetrics {
    pub size: Size,
    pub row_height: u32,
    /// Space between neighbouring tiles, horizontally and vertically.
    pub gap: u32,
}

impl GridMetrics {
    pub const fn new(size: Size, row_height: u32) -> Self {
        Self {
            size,
            row_height,
            gap: 0,
        }
    }

    pub const fn with_gap(mut self, gap: u32) -> Self {
        self.gap = gap;
        self
    }
}

/// Where one tile lands, both in grid units and in viewport cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilePlacement {
    pub item_id: ItemId,
    pub row_id: RowId,
    pub row_index: usize,
    pub column_index: usize,
    /// First grid unit occupied by the tile.
    pub column_start: u32,
    /// Grid units occupied by the tile.
    pub span: u32,
    pub rect: Rect,
}

/// Project every tile of `config` onto the viewport.
///
/// Unit boundaries map to `x(c) = c * width / columns`, so tiles in a row
/// cover the full width with no drift. The gap is taken from the right and
/// bottom edge of each tile except the last one on either axis.
pub fn solve(config: &DashboardConfig, columns: u32, metrics: GridMetrics) -> Vec<TilePlacement> {
    if columns == 0 {
        return Vec::new();
    }

    let width = metrics.size.width as u64;
    let unit_x = |unit: u32| ((unit as u64 * width) / columns as u64) as u32;
    let row_count = config.rows.len();
    let mut placements = Vec::with_capacity(config.item_count());
    let mut y = 0u32;

    for (row_index, row) in config.rows.iter().enumerate() {
        let row_gap = if row_index + 1 < row_count {
            metrics.gap
        } else {
            0
        };
        let height = metrics.row_height.saturating_sub(row_gap);

        let mut cursor = 0u32;
        let last_column = row.items.len().saturating_sub(1);
        for (column_index, (item, span)) in
            row.items.iter().zip(row.column_sizes.iter()).enumerate()
        {
            let start = unit_x(cursor);
            let end = unit_x(cursor.saturating_add(*span).min(columns));
            let column_gap = if column_index < last_column {
                metrics.gap
            } else {
                0
            };

            placements.push(TilePlacement {
                item_id: item.id.clone(),
                row_id: row.id.clone(),
                row_index,
                column_index,
                column_start: cursor,
                span: *span,
                rect: Rect::new(
                    start,
                    y,
                    end.saturating_sub(start).saturating_sub(column_gap),
                    height,
                ),
            });
            cursor = cursor.saturating_add(*span);
        }

        y = y.saturating_add(metrics.row_height);
    }

    placements
}

/// The tile under a viewport cell, if any.
pub fn item_at(placements: &[TilePlacement], x: u32, y: u32) -> Option<&TilePlacement> {
    placements
        .iter()
        .find(|placement| placement.rect.contains(x, y))
}

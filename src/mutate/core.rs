use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::audit::{MutationAuditEventBuilder, MutationKind};
use crate::balance::{balance, resize_for_insert};
use crate::error::{GridError, Result};
use crate::logging::{LogLevel, event_with_fields, json_kv};
use crate::model::{DashboardConfig, Item, ItemId, Row, RowId};
use crate::validate::{Validator, Violation};

use super::config::MutatorConfig;

type Details = Vec<(String, Value)>;

/// Where a moved item should land.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveTarget {
    /// An existing row, by id. Moving within the item's own row reorders it.
    Row(RowId),
    /// A row created for the item; the target index is the row position.
    NewRow,
}

impl MoveTarget {
    pub fn row(row_id: impl Into<RowId>) -> Self {
        Self::Row(row_id.into())
    }
}

/// The sanctioned ways to change a [`DashboardConfig`].
///
/// Every operation borrows the current config and returns a new one; inputs
/// are never modified and rows an operation does not touch are shared with
/// the result. Failed operations leave nothing behind: callers keep showing
/// the config they passed in.
#[derive(Debug, Clone)]
pub struct LayoutMutator {
    config: MutatorConfig,
    validator: Validator,
}

impl LayoutMutator {
    pub fn new(config: MutatorConfig) -> Result<Self> {
        if config.columns == 0 {
            return Err(GridError::InvalidColumnCount {
                count: 1,
                columns: 0,
            });
        }
        let validator = Validator::new(config.columns);
        Ok(Self { config, validator })
    }

    /// Mutator with default settings over a grid of `columns` units.
    pub fn with_columns(columns: u32) -> Result<Self> {
        Self::new(MutatorConfig::default().with_columns(columns))
    }

    pub fn columns(&self) -> u32 {
        self.config.columns
    }

    pub fn config(&self) -> &MutatorConfig {
        &self.config
    }

    pub fn validator(&self) -> Validator {
        self.validator
    }

    /// Parse a persisted dashboard and check it against this grid.
    ///
    /// Loaded data is always validated, whatever `validate_results` says.
    pub fn load(&self, raw: &str) -> Result<DashboardConfig> {
        let parsed = match DashboardConfig::from_json(raw) {
            Ok(parsed) => parsed,
            Err(err) => {
                self.report_rejected(MutationKind::Load, &err, Vec::new());
                return Err(err);
            }
        };
        if let Err(violation) = self.validator.check(&parsed) {
            let err = GridError::InvariantViolation(violation);
            self.report_violation(MutationKind::Load, &err, Vec::new());
            return Err(err);
        }
        self.report_applied(MutationKind::Load, None, &parsed, Vec::new());
        Ok(parsed)
    }

    /// Drop every listed item. Rows left empty disappear; rows that lost
    /// items are reset to an even split; untouched rows are shared as-is.
    /// Ids that are not present are ignored.
    pub fn remove_items(
        &self,
        item_ids: &HashSet<ItemId>,
        config: &DashboardConfig,
    ) -> Result<DashboardConfig> {
        let details = vec![json_kv("items", item_ids.len())];
        let outcome = self.strip_items(config, |id| item_ids.contains(id));
        self.finish(MutationKind::RemoveItems, config, outcome, details)
    }

    /// Drop a whole row together with its items.
    pub fn remove_row(&self, config: &DashboardConfig, row_id: &str) -> Result<DashboardConfig> {
        let details = vec![json_kv("row_id", row_id)];
        let outcome = match config.row_index(row_id) {
            Some(idx) => {
                let mut rows = config.rows.clone();
                rows.remove(idx);
                Ok(config.with_rows(rows))
            }
            None => Err(GridError::RowNotFound(row_id.to_string())),
        };
        self.finish(MutationKind::RemoveRow, config, outcome, details)
    }

    /// Insert a new full-width row holding `first_item` at `index`
    /// (clamped to the row count).
    pub fn insert_row(
        &self,
        config: &DashboardConfig,
        index: usize,
        first_item: Item,
    ) -> Result<DashboardConfig> {
        let details = vec![json_kv("index", index), json_kv("item_id", first_item.id.as_str())];
        let outcome = self.build_insert_row(config, index, first_item);
        self.finish(MutationKind::InsertRow, config, outcome, details)
    }

    /// Add `item` to an existing row at `at` (default: append) and resize the
    /// row per the configured add policy.
    pub fn add_item_to_row(
        &self,
        config: &DashboardConfig,
        row_id: &str,
        item: Item,
        at: Option<usize>,
    ) -> Result<DashboardConfig> {
        let details = vec![
            json_kv("row_id", row_id),
            json_kv("item_id", item.id.as_str()),
            json_kv("at", at),
        ];
        let outcome = self.build_add_item(config, row_id, item, at);
        self.finish(MutationKind::AddItem, config, outcome, details)
    }

    /// Relocate an item, keeping its identity.
    ///
    /// Within its own row the item and its width are reordered together.
    /// Across rows the source is rebalanced (or dropped when emptied) and the
    /// target is resized per the add policy.
    pub fn move_item(
        &self,
        config: &DashboardConfig,
        item_id: &str,
        target: MoveTarget,
        target_index: usize,
    ) -> Result<DashboardConfig> {
        let mut details = vec![
            json_kv("item_id", item_id),
            json_kv("target_index", target_index),
        ];
        details.push(match &target {
            MoveTarget::Row(row_id) => json_kv("target_row", row_id.as_str()),
            MoveTarget::NewRow => json_kv("target_row", Value::Null),
        });
        let outcome = self.build_move(config, item_id, target, target_index);
        self.finish(MutationKind::MoveItem, config, outcome, details)
    }

    /// Shift the boundary between columns `boundary` and `boundary + 1` by
    /// `delta` units (positive widens the left column). The shift is clamped
    /// so neither neighbour drops below one unit; the row total never changes.
    pub fn resize_column(
        &self,
        config: &DashboardConfig,
        row_id: &str,
        boundary: usize,
        delta: i32,
    ) -> Result<DashboardConfig> {
        let details = vec![
            json_kv("row_id", row_id),
            json_kv("boundary", boundary),
            json_kv("delta", delta),
        ];
        let outcome = self.build_resize(config, row_id, boundary, delta);
        self.finish(MutationKind::ResizeColumn, config, outcome, details)
    }

    /// Reset a row to the even split, discarding manual resizes.
    pub fn equalize_row(&self, config: &DashboardConfig, row_id: &str) -> Result<DashboardConfig> {
        let details = vec![json_kv("row_id", row_id)];
        let outcome = self.build_equalize(config, row_id);
        self.finish(MutationKind::EqualizeRow, config, outcome, details)
    }

    /// Move the row at `from` to position `to`. Both must be valid indices.
    pub fn reorder_rows(
        &self,
        config: &DashboardConfig,
        from: usize,
        to: usize,
    ) -> Result<DashboardConfig> {
        let details = vec![json_kv("from", from), json_kv("to", to)];
        let len = config.rows.len();
        let outcome = if from >= len {
            Err(GridError::RowIndexOutOfRange { index: from, len })
        } else if to >= len {
            Err(GridError::RowIndexOutOfRange { index: to, len })
        } else {
            let mut rows = config.rows.clone();
            let row = rows.remove(from);
            rows.insert(to, row);
            Ok(config.with_rows(rows))
        };
        self.finish(MutationKind::ReorderRows, config, outcome, details)
    }

    /// Log the current metrics snapshot, if both a logger and metrics are set.
    pub fn log_metrics_snapshot(&self) {
        let (Some(logger), Some(metrics)) =
            (self.config.logger.as_ref(), self.config.metrics.as_ref())
        else {
            return;
        };
        if let Ok(guard) = metrics.lock() {
            let event = guard.snapshot().to_log_event(&self.config.metrics_target);
            let _ = logger.log_event(event);
        }
    }

    fn strip_items<F>(&self, config: &DashboardConfig, remove: F) -> Result<DashboardConfig>
    where
        F: Fn(&str) -> bool,
    {
        let mut rows = Vec::with_capacity(config.rows.len());
        for row in &config.rows {
            if let Some(kept) = self.without_items(row, &remove)? {
                rows.push(kept);
            }
        }
        Ok(config.with_rows(rows))
    }

    /// The row minus matching items, or `None` when nothing would remain.
    fn without_items<F>(&self, row: &Arc<Row>, remove: F) -> Result<Option<Arc<Row>>>
    where
        F: Fn(&str) -> bool,
    {
        if !row.items.iter().any(|item| remove(&item.id)) {
            return Ok(Some(Arc::clone(row)));
        }

        let items: Vec<Item> = row
            .items
            .iter()
            .filter(|item| !remove(&item.id))
            .cloned()
            .collect();
        if items.is_empty() {
            return Ok(None);
        }

        let column_sizes = balance(items.len(), self.columns())?;
        Ok(Some(Arc::new(row.rebuilt(items, column_sizes))))
    }

    /// The row with `item` inserted at `at`, widths per the add policy.
    fn with_item(&self, row: &Row, item: Item, at: usize) -> Result<Row> {
        let at = at.min(row.items.len());
        let column_sizes =
            resize_for_insert(self.config.add_policy, &row.column_sizes, at, self.columns())?;
        let mut items = row.items.clone();
        items.insert(at, item);
        Ok(row.rebuilt(items, column_sizes))
    }

    fn build_insert_row(
        &self,
        config: &DashboardConfig,
        index: usize,
        item: Item,
    ) -> Result<DashboardConfig> {
        if config.contains_item(&item.id) {
            return Err(GridError::DuplicateItemId(item.id));
        }
        let row = Row::single(config.next_row_id(), item, self.columns());
        let mut rows = config.rows.clone();
        rows.insert(index.min(rows.len()), Arc::new(row));
        Ok(config.with_rows(rows))
    }

    fn build_add_item(
        &self,
        config: &DashboardConfig,
        row_id: &str,
        item: Item,
        at: Option<usize>,
    ) -> Result<DashboardConfig> {
        let row_idx = config
            .row_index(row_id)
            .ok_or_else(|| GridError::RowNotFound(row_id.to_string()))?;
        if config.contains_item(&item.id) {
            return Err(GridError::DuplicateItemId(item.id));
        }

        let row = &config.rows[row_idx];
        let at = at.unwrap_or(row.items.len());
        let updated = self.with_item(row, item, at)?;

        let mut rows = config.rows.clone();
        rows[row_idx] = Arc::new(updated);
        Ok(config.with_rows(rows))
    }

    fn build_move(
        &self,
        config: &DashboardConfig,
        item_id: &str,
        target: MoveTarget,
        target_index: usize,
    ) -> Result<DashboardConfig> {
        let (source_idx, item_idx) = config
            .locate_item(item_id)
            .ok_or_else(|| GridError::ItemNotFound(item_id.to_string()))?;
        let source = &config.rows[source_idx];
        let moved = source.items[item_idx].clone();

        match target {
            MoveTarget::Row(target_id) if target_id == source.id => {
                let to = target_index.min(source.items.len().saturating_sub(1));
                if to == item_idx {
                    return Ok(config.clone());
                }
                let mut items = source.items.clone();
                let mut column_sizes = source.column_sizes.clone();
                let item = items.remove(item_idx);
                let size = column_sizes.remove(item_idx);
                items.insert(to, item);
                column_sizes.insert(to, size);

                let mut rows = config.rows.clone();
                rows[source_idx] = Arc::new(source.rebuilt(items, column_sizes));
                Ok(config.with_rows(rows))
            }
            MoveTarget::Row(target_id) => {
                let target_idx = config
                    .row_index(&target_id)
                    .ok_or(GridError::RowNotFound(target_id))?;
                // Build the target first so a full row fails before anything changes.
                let updated_target = self.with_item(&config.rows[target_idx], moved, target_index)?;
                let updated_source = self.without_items(source, |id| id == item_id)?;

                let mut rows = config.rows.clone();
                rows[target_idx] = Arc::new(updated_target);
                match updated_source {
                    Some(row) => rows[source_idx] = row,
                    None => {
                        rows.remove(source_idx);
                    }
                }
                Ok(config.with_rows(rows))
            }
            MoveTarget::NewRow => {
                let new_row = Row::single(config.next_row_id(), moved, self.columns());
                let mut rows = config.rows.clone();
                match self.without_items(source, |id| id == item_id)? {
                    Some(row) => rows[source_idx] = row,
                    None => {
                        rows.remove(source_idx);
                    }
                }
                rows.insert(target_index.min(rows.len()), Arc::new(new_row));
                Ok(config.with_rows(rows))
            }
        }
    }

    fn build_resize(
        &self,
        config: &DashboardConfig,
        row_id: &str,
        boundary: usize,
        delta: i32,
    ) -> Result<DashboardConfig> {
        let row_idx = config
            .row_index(row_id)
            .ok_or_else(|| GridError::RowNotFound(row_id.to_string()))?;
        let row = &config.rows[row_idx];
        let items = row.items.len();
        if row.column_sizes.len() != items {
            return Err(GridError::InvariantViolation(Violation::LengthMismatch {
                row_id: row.id.clone(),
                items,
                sizes: row.column_sizes.len(),
            }));
        }
        if boundary >= items.saturating_sub(1) {
            return Err(GridError::BoundaryOutOfRange {
                row_id: row_id.to_string(),
                boundary,
                items,
            });
        }

        let left = row.column_sizes[boundary] as i64;
        let right = row.column_sizes[boundary + 1] as i64;
        let applied = (delta as i64).min(right - 1).max(1 - left);
        if applied == 0 {
            return Ok(config.clone());
        }

        let mut column_sizes = row.column_sizes.clone();
        column_sizes[boundary] = u32::try_from(left + applied).unwrap_or(0);
        column_sizes[boundary + 1] = u32::try_from(right - applied).unwrap_or(0);

        let mut rows = config.rows.clone();
        rows[row_idx] = Arc::new(row.rebuilt(row.items.clone(), column_sizes));
        Ok(config.with_rows(rows))
    }

    fn build_equalize(&self, config: &DashboardConfig, row_id: &str) -> Result<DashboardConfig> {
        let row_idx = config
            .row_index(row_id)
            .ok_or_else(|| GridError::RowNotFound(row_id.to_string()))?;
        let row = &config.rows[row_idx];
        let column_sizes = balance(row.items.len(), self.columns())?;
        if column_sizes == row.column_sizes {
            return Ok(config.clone());
        }

        let mut rows = config.rows.clone();
        rows[row_idx] = Arc::new(row.rebuilt(row.items.clone(), column_sizes));
        Ok(config.with_rows(rows))
    }

    /// Gate a candidate result and report the outcome.
    fn finish(
        &self,
        kind: MutationKind,
        before: &DashboardConfig,
        outcome: Result<DashboardConfig>,
        details: Details,
    ) -> Result<DashboardConfig> {
        let candidate = match outcome {
            Ok(candidate) => candidate,
            Err(err @ GridError::InvariantViolation(_)) => {
                self.report_violation(kind, &err, details);
                return Err(err);
            }
            Err(err) => {
                self.report_rejected(kind, &err, details);
                return Err(err);
            }
        };

        if self.config.validate_results {
            if let Err(violation) = self.validator.check(&candidate) {
                let err = GridError::InvariantViolation(violation);
                self.report_violation(kind, &err, details);
                return Err(err);
            }
        }

        self.report_applied(kind, Some(before), &candidate, details);
        Ok(candidate)
    }

    fn report_applied(
        &self,
        kind: MutationKind,
        before: Option<&DashboardConfig>,
        after: &DashboardConfig,
        details: Details,
    ) {
        let rows_before = before.map_or(0, |config| config.rows.len());
        let rows_after = after.rows.len();

        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_applied(rows_before, rows_after);
            }
        }

        if self.config.audit.enabled() {
            let mut builder = MutationAuditEventBuilder::new(kind, after.fingerprint());
            if let Some(before) = before {
                builder.before(before.fingerprint());
            }
            for (key, value) in details.iter().cloned() {
                builder.detail(key, value);
            }
            self.config.audit.record(builder.finish());
        }

        let mut fields = details;
        fields.push(json_kv("op", kind.as_str()));
        fields.push(json_kv("rows_before", rows_before));
        fields.push(json_kv("rows_after", rows_after));
        self.emit(self.config.level, "mutation.applied", fields);
    }

    fn report_rejected(&self, kind: MutationKind, err: &GridError, details: Details) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_rejected();
            }
        }

        let mut fields = details;
        fields.push(json_kv("op", kind.as_str()));
        fields.push(json_kv("error_kind", err.kind()));
        fields.push(json_kv("error", err.to_string()));
        self.emit(self.config.level, "mutation.rejected", fields);
    }

    fn report_violation(&self, kind: MutationKind, err: &GridError, details: Details) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_invariant_violation();
            }
        }

        let mut fields = details;
        fields.push(json_kv("op", kind.as_str()));
        fields.push(json_kv("violation", json!(err.to_string())));
        self.emit(LogLevel::Error, "mutation.invariant_violation", fields);
    }

    fn emit(&self, level: LogLevel, message: &str, fields: Details) {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = event_with_fields(level, &self.config.log_target, message, fields);
            let _ = logger.log_event(event);
        }
    }
}

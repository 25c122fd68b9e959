use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{DashboardConfig, Item, ItemId, RowId};

use super::core::{LayoutMutator, MoveTarget};

/// One mutator operation as data, so UI handlers can queue or replay them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    RemoveItems {
        item_ids: Vec<ItemId>,
    },
    RemoveRow {
        row_id: RowId,
    },
    InsertRow {
        index: usize,
        item: Item,
    },
    AddItem {
        row_id: RowId,
        item: Item,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        at: Option<usize>,
    },
    MoveItem {
        item_id: ItemId,
        target: MoveTarget,
        target_index: usize,
    },
    ResizeColumn {
        row_id: RowId,
        boundary: usize,
        delta: i32,
    },
    EqualizeRow {
        row_id: RowId,
    },
    ReorderRows {
        from: usize,
        to: usize,
    },
}

impl LayoutMutator {
    pub fn apply(&self, config: &DashboardConfig, mutation: &Mutation) -> Result<DashboardConfig> {
        match mutation {
            Mutation::RemoveItems { item_ids } => {
                let ids: HashSet<ItemId> = item_ids.iter().cloned().collect();
                self.remove_items(&ids, config)
            }
            Mutation::RemoveRow { row_id } => self.remove_row(config, row_id),
            Mutation::InsertRow { index, item } => self.insert_row(config, *index, item.clone()),
            Mutation::AddItem { row_id, item, at } => {
                self.add_item_to_row(config, row_id, item.clone(), *at)
            }
            Mutation::MoveItem {
                item_id,
                target,
                target_index,
            } => self.move_item(config, item_id, target.clone(), *target_index),
            Mutation::ResizeColumn {
                row_id,
                boundary,
                delta,
            } => self.resize_column(config, row_id, *boundary, *delta),
            Mutation::EqualizeRow { row_id } => self.equalize_row(config, row_id),
            Mutation::ReorderRows { from, to } => self.reorder_rows(config, *from, *to),
        }
    }

    /// Apply mutations in order. All or nothing: the first failure is
    /// returned and no intermediate config escapes.
    pub fn apply_all<'a, I>(&self, config: &DashboardConfig, mutations: I) -> Result<DashboardConfig>
    where
        I: IntoIterator<Item = &'a Mutation>,
    {
        let mut current = config.clone();
        for mutation in mutations {
            current = self.apply(&current, mutation)?;
        }
        Ok(current)
    }
}

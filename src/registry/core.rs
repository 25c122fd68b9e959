use std::collections::{HashMap, HashSet};

use crate::model::{DashboardConfig, Fingerprint, Row, RowId};

#[derive(Debug, Clone)]
pub struct RowState {
    pub index: usize,
    pub fingerprint: Fingerprint,
    pub is_dirty: bool,
}

/// Tracks which rows of a dashboard changed between syncs so a renderer can
/// redraw only those.
#[derive(Debug, Default)]
pub struct TileRegistry {
    entries: HashMap<RowId, RowState>,
    dirty: HashSet<RowId>,
    removed: HashSet<RowId>,
}

impl TileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sync(&mut self, config: &DashboardConfig) {
        use std::collections::hash_map::Entry;

        for (index, row) in config.rows.iter().enumerate() {
            let fingerprint = row.fingerprint();
            match self.entries.entry(row.id.clone()) {
                Entry::Occupied(mut entry) => {
                    let state = entry.get_mut();
                    if state.fingerprint != fingerprint || state.index != index {
                        state.fingerprint = fingerprint;
                        state.index = index;
                        state.is_dirty = true;
                        self.dirty.insert(row.id.clone());
                    }
                }
                Entry::Vacant(vacant) => {
                    vacant.insert(RowState {
                        index,
                        fingerprint,
                        is_dirty: true,
                    });
                    self.dirty.insert(row.id.clone());
                    self.removed.remove(&row.id);
                }
            }
        }

        // Forget rows no longer present.
        let present: HashSet<&str> = config.rows.iter().map(|row| row.id.as_str()).collect();
        let gone: Vec<RowId> = self
            .entries
            .keys()
            .filter(|id| !present.contains(id.as_str()))
            .cloned()
            .collect();
        for id in gone {
            self.entries.remove(&id);
            self.dirty.remove(&id);
            self.removed.insert(id);
        }
    }

    /// Drain the rows that need a redraw, in dashboard order.
    pub fn take_dirty(&mut self) -> Vec<(RowId, RowState)> {
        let mut drained: Vec<_> = self
            .dirty
            .drain()
            .filter_map(|id| {
                self.entries.get_mut(&id).map(|state| {
                    state.is_dirty = false;
                    (id, state.clone())
                })
            })
            .collect();
        drained.sort_by_key(|(_, state)| state.index);
        drained
    }

    /// Drain the ids of rows that disappeared since the last call.
    pub fn take_removed(&mut self) -> Vec<RowId> {
        let mut removed: Vec<_> = self.removed.drain().collect();
        removed.sort();
        removed
    }

    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn is_current(&self, row: &Row) -> bool {
        self.entries
            .get(&row.id)
            .is_some_and(|state| state.fingerprint == row.fingerprint())
    }
}

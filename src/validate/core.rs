use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::model::{DashboardConfig, ItemId, Row, RowId};

/// A structural invariant broken by a dashboard config.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("row `{row_id}` has {items} items but {sizes} column sizes")]
    LengthMismatch {
        row_id: RowId,
        items: usize,
        sizes: usize,
    },
    #[error("row `{row_id}` column sizes sum to {sum}, expected {expected}")]
    ColumnSum {
        row_id: RowId,
        sum: u64,
        expected: u32,
    },
    #[error("item `{item_id}` in row `{row_id}` has zero width")]
    ZeroWidth { row_id: RowId, item_id: ItemId },
    #[error("item `{item_id}` appears in row `{first_row}` and row `{second_row}`")]
    DuplicateItem {
        item_id: ItemId,
        first_row: RowId,
        second_row: RowId,
    },
    #[error("row `{row_id}` has no items")]
    EmptyRow { row_id: RowId },
    #[error("row id `{row_id}` is used more than once")]
    DuplicateRowId { row_id: RowId },
}

/// Checks the structural invariants of a dashboard layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validator {
    columns: u32,
}

impl Validator {
    pub fn new(columns: u32) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// First violated invariant, if any.
    pub fn check(&self, config: &DashboardConfig) -> Result<(), Violation> {
        let mut first = None;
        self.scan(config, |violation| {
            first = Some(violation);
            false
        });
        first.map_or(Ok(()), Err)
    }

    /// Every violated invariant, in row order.
    pub fn violations(&self, config: &DashboardConfig) -> Vec<Violation> {
        let mut found = Vec::new();
        self.scan(config, |violation| {
            found.push(violation);
            true
        });
        found
    }

    pub fn is_valid(&self, config: &DashboardConfig) -> bool {
        self.check(config).is_ok()
    }

    /// Walks the config, handing each violation to `report`; stops as soon as
    /// `report` returns false.
    fn scan<F>(&self, config: &DashboardConfig, mut report: F)
    where
        F: FnMut(Violation) -> bool,
    {
        let mut seen_rows: HashSet<&str> = HashSet::new();
        let mut seen_items: HashMap<&str, &str> = HashMap::new();

        for row in &config.rows {
            if !seen_rows.insert(row.id.as_str())
                && !report(Violation::DuplicateRowId {
                    row_id: row.id.clone(),
                })
            {
                return;
            }

            for violation in self.row_violations(row) {
                if !report(violation) {
                    return;
                }
            }

            for item in &row.items {
                if let Some(first_row) = seen_items.insert(item.id.as_str(), row.id.as_str()) {
                    let violation = Violation::DuplicateItem {
                        item_id: item.id.clone(),
                        first_row: first_row.to_string(),
                        second_row: row.id.clone(),
                    };
                    if !report(violation) {
                        return;
                    }
                }
            }
        }
    }

    fn row_violations(&self, row: &Row) -> Vec<Violation> {
        let mut found = Vec::new();

        if row.items.is_empty() {
            found.push(Violation::EmptyRow {
                row_id: row.id.clone(),
            });
        }

        if row.items.len() != row.column_sizes.len() {
            found.push(Violation::LengthMismatch {
                row_id: row.id.clone(),
                items: row.items.len(),
                sizes: row.column_sizes.len(),
            });
        }

        for (item, size) in row.items.iter().zip(row.column_sizes.iter()) {
            if *size == 0 {
                found.push(Violation::ZeroWidth {
                    row_id: row.id.clone(),
                    item_id: item.id.clone(),
                });
            }
        }

        let sum = row.total_width();
        if !row.items.is_empty() && sum != self.columns as u64 {
            found.push(Violation::ColumnSum {
                row_id: row.id.clone(),
                sum,
                expected: self.columns,
            });
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Item;

    fn row(id: &str, items: &[&str], sizes: &[u32]) -> Row {
        Row::new(
            id,
            items.iter().map(|item| Item::new(*item)).collect(),
            sizes.to_vec(),
        )
    }

    #[test]
    fn accepts_a_well_formed_config() {
        let config = DashboardConfig::new(vec![
            row("row-1", &["a", "b"], &[6, 6]),
            row("row-2", &["c"], &[12]),
        ]);
        let validator = Validator::new(12);
        assert!(validator.is_valid(&config));
        assert!(validator.violations(&config).is_empty());
        assert!(validator.is_valid(&DashboardConfig::default()));
    }

    #[test]
    fn reports_length_mismatch() {
        let config = DashboardConfig::new(vec![row("row-1", &["a", "b"], &[12])]);
        assert_eq!(
            Validator::new(12).check(&config),
            Err(Violation::LengthMismatch {
                row_id: "row-1".into(),
                items: 2,
                sizes: 1,
            })
        );
    }

    #[test]
    fn reports_column_sum_drift() {
        let config = DashboardConfig::new(vec![row("row-1", &["a", "b"], &[6, 5])]);
        assert_eq!(
            Validator::new(12).check(&config),
            Err(Violation::ColumnSum {
                row_id: "row-1".into(),
                sum: 11,
                expected: 12,
            })
        );
    }

    #[test]
    fn reports_zero_width_columns() {
        let config = DashboardConfig::new(vec![row("row-1", &["a", "b"], &[12, 0])]);
        let violations = Validator::new(12).violations(&config);
        assert_eq!(
            violations,
            vec![Violation::ZeroWidth {
                row_id: "row-1".into(),
                item_id: "b".into(),
            }]
        );
    }

    #[test]
    fn reports_duplicate_items_across_rows() {
        let config = DashboardConfig::new(vec![
            row("row-1", &["a"], &[12]),
            row("row-2", &["a"], &[12]),
        ]);
        assert_eq!(
            Validator::new(12).check(&config),
            Err(Violation::DuplicateItem {
                item_id: "a".into(),
                first_row: "row-1".into(),
                second_row: "row-2".into(),
            })
        );
    }

    #[test]
    fn reports_empty_rows_and_duplicate_row_ids() {
        let config = DashboardConfig::new(vec![
            row("row-1", &["a"], &[12]),
            row("row-1", &[], &[]),
        ]);
        let violations = Validator::new(12).violations(&config);
        assert_eq!(
            violations,
            vec![
                Violation::DuplicateRowId {
                    row_id: "row-1".into()
                },
                Violation::EmptyRow {
                    row_id: "row-1".into()
                },
            ]
        );
    }
}

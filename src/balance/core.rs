use crate::error::{GridError, Result};

/// How a row's widths are recomputed when an item is added to it.
///
/// Removal always resets to [`balance`]; additions follow this policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RebalancePolicy {
    /// Discard manual resizes and split the row evenly.
    #[default]
    Equalize,
    /// Keep existing widths where possible and carve the new column out of
    /// the widest neighbours.
    PreserveExisting,
}

/// Split `columns` grid units across `count` items.
///
/// Every slot gets `columns / count`; the remainder goes one unit each to the
/// leftmost slots, so the result always sums to `columns` with no slot below 1.
pub fn balance(count: usize, columns: u32) -> Result<Vec<u32>> {
    if count == 0 || (columns as usize) < count {
        return Err(GridError::InvalidColumnCount { count, columns });
    }

    // count <= columns here, so it fits in u32.
    let n = count as u32;
    let base = columns / n;
    let remainder = (columns - base * n) as usize;

    Ok((0..count)
        .map(|slot| if slot < remainder { base + 1 } else { base })
        .collect())
}

/// Insert a new column at `at` while keeping the existing widths as intact as
/// possible.
///
/// The new column receives `max(1, columns / (n + 1))` units, taken one at a
/// time from the widest existing column (leftmost wins ties).
pub fn insert_preserving(sizes: &[u32], at: usize, columns: u32) -> Result<Vec<u32>> {
    let count = sizes.len() + 1;
    if (columns as usize) < count {
        return Err(GridError::InvalidColumnCount { count, columns });
    }
    if sizes.is_empty() {
        return Ok(vec![columns]);
    }

    let width = (columns / count as u32).max(1);
    let mut resized = sizes.to_vec();
    for _ in 0..width {
        let widest = widest_shrinkable(&resized)
            .ok_or(GridError::InvalidColumnCount { count, columns })?;
        resized[widest] -= 1;
    }

    resized.insert(at.min(resized.len()), width);
    Ok(resized)
}

/// Recompute widths for a row that gained an item at `at`.
pub fn resize_for_insert(
    policy: RebalancePolicy,
    sizes: &[u32],
    at: usize,
    columns: u32,
) -> Result<Vec<u32>> {
    match policy {
        RebalancePolicy::Equalize => balance(sizes.len() + 1, columns),
        RebalancePolicy::PreserveExisting => insert_preserving(sizes, at, columns),
    }
}

fn widest_shrinkable(sizes: &[u32]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (idx, size) in sizes.iter().enumerate() {
        if *size <= 1 {
            continue;
        }
        match best {
            Some(current) if sizes[current] >= *size => {}
            _ => best = Some(idx),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_even_split() {
        assert_eq!(balance(3, 12).unwrap(), vec![4, 4, 4]);
        assert_eq!(balance(1, 12).unwrap(), vec![12]);
    }

    #[test]
    fn balance_gives_remainder_to_leftmost_slots() {
        assert_eq!(balance(5, 12).unwrap(), vec![3, 3, 2, 2, 2]);
        assert_eq!(balance(4, 10).unwrap(), vec![3, 3, 2, 2]);
        assert_eq!(balance(7, 12).unwrap(), vec![2, 2, 2, 2, 2, 1, 1]);
    }

    #[test]
    fn balance_always_fills_the_row() {
        for columns in 1..=24u32 {
            for count in 1..=columns as usize {
                let sizes = balance(count, columns).unwrap();
                assert_eq!(sizes.len(), count);
                assert_eq!(sizes.iter().sum::<u32>(), columns);
                assert!(sizes.iter().all(|size| *size >= 1));
            }
        }
    }

    #[test]
    fn balance_rejects_impossible_counts() {
        assert!(matches!(
            balance(0, 12),
            Err(GridError::InvalidColumnCount {
                count: 0,
                columns: 12
            })
        ));
        assert!(matches!(
            balance(13, 12),
            Err(GridError::InvalidColumnCount { count: 13, .. })
        ));
    }

    #[test]
    fn preserving_insert_takes_from_widest_column() {
        // new column gets 12 / 3 = 4 units, all from the 8-wide column
        let sizes = insert_preserving(&[8, 4], 2, 12).unwrap();
        assert_eq!(sizes, vec![4, 4, 4]);

        let sizes = insert_preserving(&[10, 2], 1, 12).unwrap();
        assert_eq!(sizes, vec![6, 4, 2]);
    }

    #[test]
    fn preserving_insert_into_empty_row_spans_grid() {
        assert_eq!(insert_preserving(&[], 0, 12).unwrap(), vec![12]);
    }

    #[test]
    fn preserving_insert_respects_floor() {
        let sizes = insert_preserving(&[1, 1, 10], 0, 12).unwrap();
        assert_eq!(sizes, vec![3, 1, 1, 7]);
        assert_eq!(sizes.iter().sum::<u32>(), 12);

        assert!(insert_preserving(&[1, 1, 1], 0, 3).is_err());
    }

    #[test]
    fn resize_for_insert_dispatches_on_policy() {
        assert_eq!(
            resize_for_insert(RebalancePolicy::Equalize, &[8, 4], 0, 12).unwrap(),
            vec![4, 4, 4]
        );
        assert_eq!(
            resize_for_insert(RebalancePolicy::PreserveExisting, &[9, 3], 0, 12).unwrap(),
            vec![4, 5, 3]
        );
    }
}

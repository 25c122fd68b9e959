use std::sync::Arc;

use blake3::{Hash, Hasher};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// Identifier of a placed tile; matches the id of the visualization it shows.
pub type ItemId = String;

/// Identifier of a dashboard row.
pub type RowId = String;

/// Content hash of a row or a whole layout.
pub type Fingerprint = Hash;

/// Persisted fields the engine does not interpret.
pub type ExtraFields = Map<String, Value>;

const ROW_ID_PREFIX: &str = "row-";
const KIND_KEY: &str = "type";

/// A placed tile referencing one visualization.
///
/// The persisted `type` stays in `extra` verbatim, whatever its JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Item {
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            extra: ExtraFields::new(),
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.extra.insert(KIND_KEY.to_string(), Value::String(kind.into()));
        self
    }

    /// The rendered visualization type, when persisted as a string.
    pub fn kind(&self) -> Option<&str> {
        self.kind_value().and_then(Value::as_str)
    }

    /// The raw persisted `type`, including `null` and non-string values.
    pub fn kind_value(&self) -> Option<&Value> {
        self.extra.get(KIND_KEY)
    }
}

/// A horizontal strip of the grid.
///
/// `column_sizes[i]` is the width, in grid units, of `items[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub id: RowId,
    pub items: Vec<Item>,
    pub column_sizes: Vec<u32>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Row {
    pub fn new(id: impl Into<RowId>, items: Vec<Item>, column_sizes: Vec<u32>) -> Self {
        Self {
            id: id.into(),
            items,
            column_sizes,
            extra: ExtraFields::new(),
        }
    }

    /// A row holding one item that spans the full grid width.
    pub fn single(id: impl Into<RowId>, item: Item, columns: u32) -> Self {
        Self::new(id, vec![item], vec![columns])
    }

    /// Same row identity and extra fields with a new item set.
    pub(crate) fn rebuilt(&self, items: Vec<Item>, column_sizes: Vec<u32>) -> Self {
        Self {
            id: self.id.clone(),
            items,
            column_sizes,
            extra: self.extra.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn position_of(&self, item_id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == item_id)
    }

    pub fn total_width(&self) -> u64 {
        self.column_sizes.iter().map(|size| *size as u64).sum()
    }

    /// Content hash of the row, stable across processes.
    pub fn fingerprint(&self) -> Fingerprint {
        let mut hasher = Hasher::new();
        self.hash_into(&mut hasher);
        hasher.finalize()
    }

    fn hash_into(&self, hasher: &mut Hasher) {
        hash_str(hasher, &self.id);
        hasher.update(&(self.items.len() as u64).to_le_bytes());
        for (item, size) in self.items.iter().zip(self.column_sizes.iter()) {
            hash_str(hasher, &item.id);
            hash_extra(hasher, &item.extra);
            hasher.update(&size.to_le_bytes());
        }
        // Lengths can disagree on unvalidated input; keep the hash honest.
        for size in self.column_sizes.iter().skip(self.items.len()) {
            hasher.update(&size.to_le_bytes());
        }
        hash_extra(hasher, &self.extra);
    }
}

/// The whole dashboard layout: rows top to bottom.
///
/// Rows sit behind `Arc` so that operations leaving a row untouched hand back
/// the very same allocation; callers can compare with [`Arc::ptr_eq`] to skip
/// re-rendering it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub rows: Vec<Arc<Row>>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl DashboardConfig {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows: rows.into_iter().map(Arc::new).collect(),
            extra: ExtraFields::new(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Copy of this config with a different row list and the same extra fields.
    pub(crate) fn with_rows(&self, rows: Vec<Arc<Row>>) -> Self {
        Self {
            rows,
            extra: self.extra.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, row_id: &str) -> Option<&Arc<Row>> {
        self.rows.iter().find(|row| row.id == row_id)
    }

    pub fn row_index(&self, row_id: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.id == row_id)
    }

    /// Position of an item as `(row index, item index)`.
    pub fn locate_item(&self, item_id: &str) -> Option<(usize, usize)> {
        self.rows
            .iter()
            .enumerate()
            .find_map(|(row_idx, row)| row.position_of(item_id).map(|idx| (row_idx, idx)))
    }

    pub fn contains_item(&self, item_id: &str) -> bool {
        self.locate_item(item_id).is_some()
    }

    pub fn item_ids(&self) -> impl Iterator<Item = &ItemId> + '_ {
        self.rows
            .iter()
            .flat_map(|row| row.items.iter().map(|item| &item.id))
    }

    pub fn item_count(&self) -> usize {
        self.rows.iter().map(|row| row.items.len()).sum()
    }

    /// Fresh `row-<n>` id not used by any row of this config.
    pub fn next_row_id(&self) -> RowId {
        let mut next = self
            .rows
            .iter()
            .filter_map(|row| row.id.strip_prefix(ROW_ID_PREFIX)?.parse::<u64>().ok())
            .max()
            .map_or(1, |max| max.saturating_add(1));

        loop {
            let candidate = format!("{ROW_ID_PREFIX}{next}");
            if self.row(&candidate).is_none() {
                return candidate;
            }
            next = next.wrapping_add(1);
        }
    }

    /// Content hash of the whole layout.
    pub fn fingerprint(&self) -> Fingerprint {
        let mut hasher = Hasher::new();
        hasher.update(&(self.rows.len() as u64).to_le_bytes());
        for row in &self.rows {
            row.hash_into(&mut hasher);
        }
        hash_extra(&mut hasher, &self.extra);
        hasher.finalize()
    }
}

fn hash_str(hasher: &mut Hasher, value: &str) {
    hasher.update(&(value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

fn hash_extra(hasher: &mut Hasher, extra: &ExtraFields) {
    hasher.update(&(extra.len() as u64).to_le_bytes());
    for (key, value) in extra {
        hash_str(hasher, key);
        hash_str(hasher, &value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERSISTED: &str = r#"{
        "rows": [
            { "id": "row-1", "items": [{ "id": "metric-a" }, { "id": "metric-b" }], "columnSizes": [6, 6] }
        ]
    }"#;

    #[test]
    fn parses_the_persisted_shape() {
        let config = DashboardConfig::from_json(PERSISTED).unwrap();
        assert_eq!(config.rows.len(), 1);
        let row = &config.rows[0];
        assert_eq!(row.id, "row-1");
        assert_eq!(row.items[1].id, "metric-b");
        assert_eq!(row.column_sizes, vec![6, 6]);
        assert_eq!(row.items[0].kind(), None);
    }

    #[test]
    fn unknown_fields_survive_a_round_trip() {
        let raw = r#"{"title":"Ops","rows":[{"id":"r","height":3,"items":[{"id":"m","type":"chart","pinned":true}],"columnSizes":[12]}]}"#;
        let config = DashboardConfig::from_json(raw).unwrap();
        assert_eq!(config.rows[0].items[0].kind(), Some("chart"));

        let encoded = config.to_json().unwrap();
        let before: Value = serde_json::from_str(raw).unwrap();
        let after: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn item_type_of_any_shape_survives_a_round_trip() {
        for raw in [
            r#"{"rows":[{"id":"r","items":[{"id":"m","type":null}],"columnSizes":[12]}]}"#,
            r#"{"rows":[{"id":"r","items":[{"id":"m","type":{"chart":"bar"}}],"columnSizes":[12]}]}"#,
            r#"{"rows":[{"id":"r","items":[{"id":"m","type":7}],"columnSizes":[12]}]}"#,
        ] {
            let config = DashboardConfig::from_json(raw).unwrap();
            let item = &config.rows[0].items[0];
            assert!(item.kind_value().is_some());
            assert_eq!(item.kind(), None);

            let before: Value = serde_json::from_str(raw).unwrap();
            let after: Value = serde_json::from_str(&config.to_json().unwrap()).unwrap();
            assert_eq!(before, after);
        }
    }

    #[test]
    fn rows_key_is_required() {
        assert!(DashboardConfig::from_json(r#"{"title":"Ops"}"#).is_err());

        let raw = r#"{"rows":[]}"#;
        let config = DashboardConfig::from_json(raw).unwrap();
        assert_eq!(config.to_json().unwrap(), raw);
    }

    #[test]
    fn item_type_feeds_the_fingerprint() {
        let plain = Row::single("row-1", Item::new("a"), 12);
        let typed = Row::single("row-1", Item::new("a").with_kind("chart"), 12);
        assert_ne!(plain.fingerprint(), typed.fingerprint());
    }

    #[test]
    fn serializes_column_sizes_in_camel_case() {
        let config = DashboardConfig::new(vec![Row::single("row-1", Item::new("a"), 12)]);
        let encoded = config.to_json().unwrap();
        assert!(encoded.contains("\"columnSizes\":[12]"));
        assert!(!encoded.contains("\"type\""));
    }

    #[test]
    fn locate_item_reports_row_and_column() {
        let config = DashboardConfig::new(vec![
            Row::single("row-1", Item::new("a"), 12),
            Row::new("row-2", vec![Item::new("b"), Item::new("c")], vec![6, 6]),
        ]);
        assert_eq!(config.locate_item("c"), Some((1, 1)));
        assert_eq!(config.locate_item("zzz"), None);
        assert_eq!(config.item_count(), 3);
        assert_eq!(
            config.item_ids().cloned().collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn next_row_id_skips_past_existing_numbers() {
        let config = DashboardConfig::new(vec![
            Row::single("row-4", Item::new("a"), 12),
            Row::single("custom", Item::new("b"), 12),
        ]);
        assert_eq!(config.next_row_id(), "row-5");
        assert_eq!(DashboardConfig::default().next_row_id(), "row-1");
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = DashboardConfig::new(vec![Row::new(
            "row-1",
            vec![Item::new("a"), Item::new("b")],
            vec![6, 6],
        )]);
        let resized = DashboardConfig::new(vec![Row::new(
            "row-1",
            vec![Item::new("a"), Item::new("b")],
            vec![8, 4],
        )]);
        assert_eq!(a.fingerprint(), a.clone().fingerprint());
        assert_ne!(a.fingerprint(), resized.fingerprint());
        assert_ne!(a.rows[0].fingerprint(), resized.rows[0].fingerprint());
    }
}

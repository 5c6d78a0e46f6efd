//! The diff result model and its text-keyed view

use std::fmt;
use std::hash::Hash;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::error::SerializationError;
use crate::model::{CellValue, Record, RowKey};
use crate::output::json::to_ascii_json;
use crate::output::text::{fmt_diff, Literal};

/// One differing field: `(column, left value, right value)`
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub column: String,
    pub left: CellValue,
    pub right: CellValue,
}

impl FieldChange {
    pub fn new(column: impl Into<String>, left: CellValue, right: CellValue) -> Self {
        Self {
            column: column.into(),
            left,
            right,
        }
    }
}

impl Serialize for FieldChange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.column, &self.left, &self.right).serialize(serializer)
    }
}

/// Keys that can be rendered as map-key text
pub trait FlattenKey {
    fn flatten_key(&self) -> String;
}

impl FlattenKey for RowKey {
    fn flatten_key(&self) -> String {
        self.flatten()
    }
}

/// Already text; flattening again must not re-join
impl FlattenKey for String {
    fn flatten_key(&self) -> String {
        self.clone()
    }
}

/// Statistics about the diff
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    pub rows_added: usize,
    pub rows_removed: usize,
    pub rows_changed: usize,
    pub cells_changed: usize,
    pub columns_added: usize,
    pub columns_removed: usize,
}

/// All differences between a left and a right table.
///
/// `K` is the row identifier: [`RowKey`] in the structured form, `String`
/// in the text-keyed view produced by [`DiffResult::to_text_keyed`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffResult<K: Hash + Eq = RowKey> {
    /// Key column names, in key order
    pub row_key: Vec<String>,
    /// Right rows whose key is absent from left
    pub rows_added: IndexMap<K, Record>,
    /// Left rows whose key is absent from right
    pub rows_removed: IndexMap<K, Record>,
    /// Keys in both tables with at least one differing common field
    pub rows_changed: IndexMap<K, Vec<FieldChange>>,
    /// Columns in right but not left, right order
    #[serde(rename = "cols_added")]
    pub columns_added: Vec<String>,
    /// Columns in left but not right, left order
    #[serde(rename = "cols_removed")]
    pub columns_removed: Vec<String>,
}

/// Result with every row key flattened to text
pub type TextKeyedDiff = DiffResult<String>;

impl<K: Hash + Eq> DiffResult<K> {
    /// Check if there are any differences
    pub fn is_empty(&self) -> bool {
        self.rows_added.is_empty()
            && self.rows_removed.is_empty()
            && self.rows_changed.is_empty()
            && self.columns_added.is_empty()
            && self.columns_removed.is_empty()
    }

    pub fn has_changes(&self) -> bool {
        !self.is_empty()
    }

    pub fn stats(&self) -> DiffStats {
        DiffStats {
            rows_added: self.rows_added.len(),
            rows_removed: self.rows_removed.len(),
            rows_changed: self.rows_changed.len(),
            cells_changed: self.rows_changed.values().map(Vec::len).sum(),
            columns_added: self.columns_added.len(),
            columns_removed: self.columns_removed.len(),
        }
    }
}

impl<K: Hash + Eq + FlattenKey> DiffResult<K> {
    /// Copy of this result keyed by flattened key text.
    ///
    /// Composite keys join their components with `", "`; scalar keys use the
    /// value's text form. Column facets are unchanged.
    pub fn to_text_keyed(&self) -> TextKeyedDiff {
        fn rekey<K: FlattenKey, V: Clone>(map: &IndexMap<K, V>) -> IndexMap<String, V> {
            map.iter()
                .map(|(k, v)| (k.flatten_key(), v.clone()))
                .collect()
        }

        DiffResult {
            row_key: self.row_key.clone(),
            rows_added: rekey(&self.rows_added),
            rows_removed: rekey(&self.rows_removed),
            rows_changed: rekey(&self.rows_changed),
            columns_added: self.columns_added.clone(),
            columns_removed: self.columns_removed.clone(),
        }
    }

    /// Canonical text of the text-keyed view
    pub fn to_text(&self) -> String {
        self.to_text_keyed().to_string()
    }

    /// Compact JSON of the text-keyed view with non-ASCII escaped
    pub fn to_json(&self) -> Result<String, SerializationError> {
        to_ascii_json(&self.to_text_keyed())
    }
}

/// Literal form; composite keys render as tuples
impl<K: Hash + Eq + Literal> fmt::Display for DiffResult<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_diff(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, CellValue)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn composite_result() -> DiffResult {
        DiffResult {
            row_key: vec!["id".to_string(), "name".to_string()],
            rows_added: IndexMap::from([(
                RowKey::from(["4C", "taco"]),
                record(&[("price", "$8.33".into()), ("stars", CellValue::Float(3.1))]),
            )]),
            rows_removed: IndexMap::new(),
            rows_changed: IndexMap::from([(
                RowKey::from(["1A", "beer"]),
                vec![FieldChange::new("price", "$6.00".into(), "$5.25".into())],
            )]),
            columns_added: vec!["stars".to_string()],
            columns_removed: Vec::new(),
        }
    }

    #[test]
    fn test_text_keyed_joins_composite_keys() {
        let text = composite_result().to_text_keyed();
        assert_eq!(
            text.rows_added.keys().collect::<Vec<_>>(),
            vec!["4C, taco"]
        );
        assert_eq!(
            text.rows_changed.keys().collect::<Vec<_>>(),
            vec!["1A, beer"]
        );
        assert_eq!(text.columns_added, vec!["stars"]);
    }

    #[test]
    fn test_flattening_twice_does_not_rejoin() {
        let once = composite_result().to_text_keyed();
        let twice = once.to_text_keyed();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_structured_result_untouched_by_flattening() {
        let result = composite_result();
        let _ = result.to_text_keyed();
        let _ = result.to_json().unwrap();
        assert!(result
            .rows_changed
            .contains_key(&RowKey::from(["1A", "beer"])));
    }

    #[test]
    fn test_field_change_serializes_as_triple() {
        let change = FieldChange::new("price", "$6.00".into(), CellValue::Null);
        assert_eq!(
            serde_json::to_string(&change).unwrap(),
            r#"["price","$6.00",null]"#
        );
    }

    #[test]
    fn test_stats() {
        let stats = composite_result().stats();
        assert_eq!(stats.rows_added, 1);
        assert_eq!(stats.rows_changed, 1);
        assert_eq!(stats.cells_changed, 1);
        assert_eq!(stats.columns_added, 1);
        assert_eq!(stats.rows_removed, 0);
    }

    #[test]
    fn test_empty() {
        let result: DiffResult = DiffResult {
            row_key: vec!["id".to_string()],
            rows_added: IndexMap::new(),
            rows_removed: IndexMap::new(),
            rows_changed: IndexMap::new(),
            columns_added: Vec::new(),
            columns_removed: Vec::new(),
        };
        assert!(result.is_empty());
        assert!(!composite_result().is_empty());
    }
}

//! Row matching by key

use indexmap::IndexMap;

use crate::model::{KeyedTable, Record, Row, RowKey};

/// Rows of two tables partitioned by key membership
#[derive(Debug)]
pub struct RowMatches<'a> {
    /// Keys only in left, left order
    pub left_only: Vec<&'a RowKey>,
    /// Keys only in right, right order
    pub right_only: Vec<&'a RowKey>,
    /// Keys in both, left order
    pub common: Vec<(&'a RowKey, &'a Row, &'a Row)>,
}

/// Row matcher using the tables' key indexes
pub struct RowMatcher;

impl RowMatcher {
    /// Match rows between left and right tables
    pub fn match_rows<'a>(left: &'a KeyedTable, right: &'a KeyedTable) -> RowMatches<'a> {
        let mut left_only = Vec::new();
        let mut common = Vec::new();

        for (key, left_row) in &left.rows {
            match right.get(key) {
                Some(right_row) => common.push((key, left_row, right_row)),
                None => left_only.push(key),
            }
        }

        let right_only = right
            .rows
            .keys()
            .filter(|key| !left.contains_key(key))
            .collect();

        RowMatches {
            left_only,
            right_only,
            common,
        }
    }
}

/// Rows of `table` whose key is absent from `other`, with full payloads
pub fn rows_only_in(table: &KeyedTable, other: &KeyedTable) -> IndexMap<RowKey, Record> {
    table
        .rows
        .iter()
        .filter(|(key, _)| !other.contains_key(key))
        .map(|(key, row)| (key.clone(), table.record(row)))
        .collect()
}

/// Right rows whose key is not in left
pub fn rows_added(left: &KeyedTable, right: &KeyedTable) -> IndexMap<RowKey, Record> {
    rows_only_in(right, left)
}

/// Left rows whose key is not in right
pub fn rows_removed(left: &KeyedTable, right: &KeyedTable) -> IndexMap<RowKey, Record> {
    rows_only_in(left, right)
}

//! Field-level comparison logic

use indexmap::IndexMap;
use rayon::prelude::*;

use super::result::FieldChange;
use super::row_diff::RowMatcher;
use crate::model::{CellValue, KeyedTable, Row, RowKey};

/// A column present in both tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonColumn {
    pub name: String,
    pub left_index: usize,
    pub right_index: usize,
}

/// Compares rows over the columns both tables share
#[derive(Debug, Clone)]
pub struct RowComparator {
    columns: Vec<CommonColumn>,
}

impl RowComparator {
    /// Common columns in left order
    pub fn new(left: &KeyedTable, right: &KeyedTable) -> Self {
        let columns = left
            .columns
            .iter()
            .enumerate()
            .filter_map(|(left_index, col)| {
                right.column_index(&col.name).map(|right_index| CommonColumn {
                    name: col.name.clone(),
                    left_index,
                    right_index,
                })
            })
            .collect();
        Self { columns }
    }

    pub fn columns(&self) -> &[CommonColumn] {
        &self.columns
    }

    /// Field changes between two rows sharing a key
    pub fn compare(&self, left_row: &Row, right_row: &Row) -> Vec<FieldChange> {
        self.columns
            .iter()
            .filter_map(|col| {
                let left = left_row.get(col.left_index).unwrap_or(&CellValue::Null);
                let right = right_row.get(col.right_index).unwrap_or(&CellValue::Null);
                values_differ(left, right)
                    .then(|| FieldChange::new(col.name.clone(), left.clone(), right.clone()))
            })
            .collect()
    }
}

/// Values differ unless structurally identical or both missing
pub fn values_differ(left: &CellValue, right: &CellValue) -> bool {
    left != right
}

/// Field changes for every key in both tables that has at least one
pub fn rows_changed(left: &KeyedTable, right: &KeyedTable) -> IndexMap<RowKey, Vec<FieldChange>> {
    let comparator = RowComparator::new(left, right);
    let matches = RowMatcher::match_rows(left, right);

    // Indexed collect keeps left row order
    let changed: Vec<(RowKey, Vec<FieldChange>)> = matches
        .common
        .par_iter()
        .filter_map(|(key, left_row, right_row)| {
            let changes = comparator.compare(left_row, right_row);
            (!changes.is_empty()).then(|| ((*key).clone(), changes))
        })
        .collect();

    changed.into_iter().collect()
}

//! Column set comparison

use rustc_hash::FxHashSet;

use crate::model::KeyedTable;

/// Columns of `table` missing from `other`, in `table`'s order
pub fn columns_only_in(table: &KeyedTable, other: &KeyedTable) -> Vec<String> {
    let other_names: FxHashSet<&str> = other.column_names().collect();
    table
        .column_names()
        .filter(|name| !other_names.contains(name))
        .map(str::to_string)
        .collect()
}

/// Columns present in right but not in left
pub fn columns_added(left: &KeyedTable, right: &KeyedTable) -> Vec<String> {
    columns_only_in(right, left)
}

/// Columns present in left but not in right
pub fn columns_removed(left: &KeyedTable, right: &KeyedTable) -> Vec<String> {
    columns_only_in(left, right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;

    fn table(names: &[&str]) -> KeyedTable {
        let header = std::iter::once("id")
            .chain(names.iter().copied())
            .enumerate()
            .map(|(i, n)| Column::new(n, i))
            .collect();
        KeyedTable::build("t.csv", header, &["id".to_string()], Vec::new()).unwrap()
    }

    #[test]
    fn test_added_in_right_order() {
        let left = table(&["name", "price"]);
        let right = table(&["stars", "name", "pic", "price"]);
        assert_eq!(columns_added(&left, &right), vec!["stars", "pic"]);
        assert!(columns_removed(&left, &right).is_empty());
    }

    #[test]
    fn test_removed_in_left_order() {
        let left = table(&["togo", "name", "score"]);
        let right = table(&["name"]);
        assert_eq!(columns_removed(&left, &right), vec!["togo", "score"]);
    }

    #[test]
    fn test_key_columns_never_reported() {
        let left = table(&["name"]);
        let right = table(&["name"]);
        assert!(columns_added(&left, &right).is_empty());
        assert!(columns_removed(&left, &right).is_empty());
    }
}

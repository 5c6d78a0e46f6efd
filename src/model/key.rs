//! Row key handling

use std::path::Path;

use super::schema::Column;
use super::table::CellValue;
use crate::error::KeyColumnError;

/// Separator between components of a flattened composite key
pub const MULTI_COL_KEY_SEP: &str = ", ";

/// Identity of a row: one value per key column
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowKey {
    /// Single key column
    Scalar(CellValue),
    /// Several key columns, in key-column order
    Composite(Vec<CellValue>),
}

impl RowKey {
    /// Text form used where keys must be strings
    pub fn flatten(&self) -> String {
        match self {
            RowKey::Scalar(value) => value.display().into_owned(),
            RowKey::Composite(values) => values
                .iter()
                .map(|v| v.display().into_owned())
                .collect::<Vec<_>>()
                .join(MULTI_COL_KEY_SEP),
        }
    }
}

impl From<&str> for RowKey {
    fn from(s: &str) -> Self {
        RowKey::Scalar(CellValue::from(s))
    }
}

impl<const N: usize> From<[&str; N]> for RowKey {
    fn from(parts: [&str; N]) -> Self {
        RowKey::Composite(parts.iter().map(|p| CellValue::from(*p)).collect())
    }
}

/// Splits full-width rows into key and payload
#[derive(Debug, Clone)]
pub struct KeyBuilder {
    key_indices: Vec<usize>,
    payload_indices: Vec<usize>,
}

impl KeyBuilder {
    /// Resolve key column names against a header
    pub fn for_header(
        path: &Path,
        header: &[Column],
        names: &[String],
    ) -> Result<Self, KeyColumnError> {
        if names.is_empty() {
            return Err(KeyColumnError::NoKeyColumns);
        }

        let mut key_indices = Vec::with_capacity(names.len());
        let mut missing = Vec::new();
        for name in names {
            match header.iter().position(|c| &c.name == name) {
                Some(idx) => key_indices.push(idx),
                None => missing.push(name.clone()),
            }
        }
        if !missing.is_empty() {
            return Err(KeyColumnError::Missing {
                path: path.to_path_buf(),
                columns: missing,
            });
        }

        let payload_indices = (0..header.len())
            .filter(|i| !key_indices.contains(i))
            .collect();

        Ok(Self {
            key_indices,
            payload_indices,
        })
    }

    /// Header positions of the non-key columns
    pub fn payload_indices(&self) -> &[usize] {
        &self.payload_indices
    }

    /// Header positions of the key columns, in key order
    pub fn key_indices(&self) -> &[usize] {
        &self.key_indices
    }

    /// Split a row into its key and payload; `None` when a key component is missing
    pub fn split(&self, mut cells: Vec<CellValue>) -> Option<(RowKey, Vec<CellValue>)> {
        let mut take = |i: usize| {
            cells
                .get_mut(i)
                .map(|c| std::mem::replace(c, CellValue::Null))
                .unwrap_or(CellValue::Null)
        };

        let components: Vec<CellValue> = self.key_indices.iter().map(|&i| take(i)).collect();
        if components.iter().any(CellValue::is_missing) {
            return None;
        }
        let payload = self.payload_indices.iter().map(|&i| take(i)).collect();

        let key = if components.len() == 1 {
            RowKey::Scalar(components.into_iter().next()?)
        } else {
            RowKey::Composite(components)
        };
        Some((key, payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Vec<Column> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| Column::new(*n, i))
            .collect()
    }

    #[test]
    fn test_flatten_scalar_is_text_form() {
        assert_eq!(RowKey::from("1A").flatten(), "1A");
        assert_eq!(RowKey::Scalar(CellValue::Int(7)).flatten(), "7");
    }

    #[test]
    fn test_flatten_composite_joins_in_key_order() {
        assert_eq!(RowKey::from(["1A", "beer"]).flatten(), "1A, beer");
        let mixed = RowKey::Composite(vec![CellValue::Int(3), CellValue::Float(2.5)]);
        assert_eq!(mixed.flatten(), "3, 2.5");
    }

    #[test]
    fn test_scalar_and_composite_never_equal() {
        assert_ne!(
            RowKey::from("1A"),
            RowKey::Composite(vec![CellValue::from("1A")])
        );
    }

    #[test]
    fn test_split_follows_key_order() {
        let names = vec!["name".to_string(), "id".to_string()];
        let builder =
            KeyBuilder::for_header(Path::new("t.csv"), &header(&["id", "name", "price"]), &names)
                .unwrap();
        assert_eq!(builder.key_indices(), &[1, 0]);

        let (key, payload) = builder
            .split(vec!["1A".into(), "beer".into(), "$6.00".into()])
            .unwrap();
        assert_eq!(key, RowKey::from(["beer", "1A"]));
        assert_eq!(payload, vec![CellValue::from("$6.00")]);
    }

    #[test]
    fn test_missing_key_columns_reported_together() {
        let names = vec!["id".to_string(), "sku".to_string(), "zone".to_string()];
        let err = KeyBuilder::for_header(Path::new("t.csv"), &header(&["id"]), &names).unwrap_err();
        match err {
            KeyColumnError::Missing { columns, .. } => assert_eq!(columns, vec!["sku", "zone"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_no_key_columns() {
        let err = KeyBuilder::for_header(Path::new("t.csv"), &header(&["id"]), &[]).unwrap_err();
        assert!(matches!(err, KeyColumnError::NoKeyColumns));
    }
}

//! KeyedTable, Row, and Cell data structures

use std::borrow::Cow;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use super::key::{KeyBuilder, RowKey};
use super::schema::Column;
use crate::error::{LoadError, Result};

/// A cell value with type information
#[derive(Debug, Clone)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(Cow<'static, str>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        if self.is_missing() || other.is_missing() {
            return self.is_missing() && other.is_missing();
        }
        match (self, other) {
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::Int(a), CellValue::Int(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => a == b,
            (CellValue::String(a), CellValue::String(b)) => a == b,
            (CellValue::Date(a), CellValue::Date(b)) => a == b,
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if self.is_missing() {
            0u8.hash(state);
            return;
        }
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Null => {}
            CellValue::Bool(b) => b.hash(state),
            CellValue::Int(i) => i.hash(state),
            // 0.0 and -0.0 compare equal
            CellValue::Float(f) if *f == 0.0 => 0.0f64.to_bits().hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::String(s) => s.hash(state),
            CellValue::Date(d) => d.hash(state),
            CellValue::DateTime(dt) => dt.hash(state),
        }
    }
}

impl CellValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Null or NaN
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Convert to the scalar text form
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed("null"),
            CellValue::Bool(b) => Cow::Owned(b.to_string()),
            CellValue::Int(i) => Cow::Owned(i.to_string()),
            CellValue::Float(f) => Cow::Owned(format_float(*f)),
            CellValue::String(s) => Cow::Borrowed(s.as_ref()),
            CellValue::Date(d) => Cow::Owned(d.to_string()),
            CellValue::DateTime(dt) => Cow::Owned(dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
        }
    }
}

/// Float text form: positional inside `[1e-4, 1e16)`, exponent outside it.
///
/// The mantissa always carries a fractional digit so floats stay
/// distinguishable from ints (`5.0`, `1.0e16`, `1.5e-7`).
pub fn format_float(f: f64) -> String {
    if !f.is_finite() {
        return f.to_string();
    }
    let magnitude = f.abs();
    if magnitude == 0.0 || (1e-4..1e16).contains(&magnitude) {
        if f.fract() == 0.0 {
            format!("{:.1}", f)
        } else {
            f.to_string()
        }
    } else {
        let exp = format!("{:e}", f);
        match exp.split_once('e') {
            Some((mantissa, power)) if !mantissa.contains('.') => {
                format!("{}.0e{}", mantissa, power)
            }
            _ => exp,
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CellValue::Null => serializer.serialize_none(),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::Int(i) => serializer.serialize_i64(*i),
            CellValue::Float(f) if f.is_nan() => serializer.serialize_none(),
            // Infinities have no JSON number form
            CellValue::Float(f) if f.is_infinite() => serializer.serialize_str(&f.to_string()),
            CellValue::Float(f) => serializer.serialize_f64(*f),
            CellValue::String(s) => serializer.serialize_str(s),
            CellValue::Date(_) | CellValue::DateTime(_) => {
                serializer.serialize_str(&self.display())
            }
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(Cow::Owned(s.to_string()))
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(Cow::Owned(s))
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl<T> From<Option<T>> for CellValue
where
    T: Into<CellValue>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Null,
        }
    }
}

/// Row payload keyed by column name, in table column order
pub type Record = IndexMap<String, CellValue>;

/// Non-key cells of one row
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Cell values aligned with the table's non-key columns
    pub cells: Vec<CellValue>,
    /// Original line/row number in source file (1-indexed)
    pub source_line: usize,
}

impl Row {
    pub fn new(cells: Vec<CellValue>, source_line: usize) -> Self {
        Self { cells, source_line }
    }

    /// Get a cell value by column index
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }
}

/// A table of rows indexed by key
#[derive(Debug, Clone)]
pub struct KeyedTable {
    /// Where the table was read from
    pub source: PathBuf,
    /// Key column names, in key order
    pub key_columns: Vec<String>,
    /// Non-key columns, in header order
    pub columns: Vec<Column>,
    /// Rows in source order
    pub rows: IndexMap<RowKey, Row>,
    /// Rows left out of the index because a key component was missing
    pub skipped_rows: usize,
}

impl KeyedTable {
    /// Build a table from a header and full-width rows of `(source_line, cells)`.
    ///
    /// Key columns are split off every row; rows whose key has a missing
    /// component are counted in `skipped_rows` and not indexed.
    pub fn build(
        source: impl Into<PathBuf>,
        header: Vec<Column>,
        key_columns: &[String],
        rows: impl IntoIterator<Item = (usize, Vec<CellValue>)>,
    ) -> Result<Self> {
        let source = source.into();
        let builder = KeyBuilder::for_header(&source, &header, key_columns)?;
        let columns = builder
            .payload_indices()
            .iter()
            .map(|&h| Column::with_type(header[h].name.clone(), h, header[h].inferred_type))
            .collect();

        let mut table = Self {
            source,
            key_columns: key_columns.to_vec(),
            columns,
            rows: IndexMap::new(),
            skipped_rows: 0,
        };

        for (line, cells) in rows {
            match builder.split(cells) {
                Some((key, payload)) => table.insert_row(key, Row::new(payload, line))?,
                None => {
                    log::warn!(
                        "{}: row {} has a missing key component, skipping",
                        table.source.display(),
                        line
                    );
                    table.skipped_rows += 1;
                }
            }
        }

        Ok(table)
    }

    fn insert_row(&mut self, key: RowKey, row: Row) -> Result<()> {
        match self.rows.entry(key) {
            Entry::Occupied(existing) => Err(LoadError::DuplicateKey {
                path: self.source.clone(),
                key: existing.key().flatten(),
                first_line: existing.get().source_line,
                line: row.source_line,
            }
            .into()),
            Entry::Vacant(slot) => {
                slot.insert(row);
                Ok(())
            }
        }
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn get(&self, key: &RowKey) -> Option<&Row> {
        self.rows.get(key)
    }

    pub fn contains_key(&self, key: &RowKey) -> bool {
        self.rows.contains_key(key)
    }

    /// Full payload of a row, keyed by column name
    pub fn record(&self, row: &Row) -> Record {
        self.columns
            .iter()
            .zip(row.cells.iter())
            .map(|(col, cell)| (col.name.clone(), cell.clone()))
            .collect()
    }

    /// Number of indexed rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of non-key columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiffError;

    fn header(names: &[&str]) -> Vec<Column> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| Column::new(*n, i))
            .collect()
    }

    #[test]
    fn test_missing_values_are_equal() {
        assert_eq!(CellValue::Null, CellValue::Float(f64::NAN));
        assert_eq!(CellValue::Float(f64::NAN), CellValue::Float(f64::NAN));
        assert_ne!(CellValue::Null, CellValue::from(""));
    }

    #[test]
    fn test_no_cross_type_equality() {
        assert_ne!(CellValue::Int(1), CellValue::Float(1.0));
        assert_ne!(CellValue::Int(1), CellValue::from("1"));
    }

    #[test]
    fn test_float_text_form() {
        assert_eq!(CellValue::Float(5.0).to_string(), "5.0");
        assert_eq!(CellValue::Float(4.9).to_string(), "4.9");
        assert_eq!(CellValue::Float(f64::INFINITY).to_string(), "inf");
        assert_eq!(CellValue::Int(5).to_string(), "5");
    }

    #[test]
    fn test_float_text_form_outside_positional_range() {
        assert_eq!(format_float(1e16), "1.0e16");
        assert_eq!(format_float(-2.5e20), "-2.5e20");
        assert_eq!(format_float(1e-7), "1.0e-7");
        assert_eq!(format_float(1.5e-7), "1.5e-7");
        assert_eq!(format_float(9999999999999998.0), "9999999999999998.0");
        assert_eq!(format_float(0.0001), "0.0001");
        assert_eq!(format_float(-0.0), "-0.0");
    }

    #[test]
    fn test_build_splits_key_columns() {
        let table = KeyedTable::build(
            "t.csv",
            header(&["id", "price"]),
            &["id".to_string()],
            vec![(2, vec![CellValue::from("1A"), CellValue::from("$6.00")])],
        )
        .unwrap();

        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["price"]);
        let key = RowKey::Scalar(CellValue::from("1A"));
        let row = table.get(&key).unwrap();
        assert_eq!(row.cells, vec![CellValue::from("$6.00")]);
        assert_eq!(table.record(row)["price"], CellValue::from("$6.00"));
    }

    #[test]
    fn test_build_rejects_duplicate_keys() {
        let err = KeyedTable::build(
            "t.csv",
            header(&["id", "price"]),
            &["id".to_string()],
            vec![
                (2, vec![CellValue::from("1A"), CellValue::from("$1")]),
                (3, vec![CellValue::from("1A"), CellValue::from("$2")]),
            ],
        )
        .unwrap_err();

        match err {
            DiffError::Load(LoadError::DuplicateKey {
                key,
                first_line,
                line,
                ..
            }) => {
                assert_eq!(key, "1A");
                assert_eq!((first_line, line), (2, 3));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_build_skips_rows_with_missing_key() {
        let table = KeyedTable::build(
            "t.csv",
            header(&["id", "price"]),
            &["id".to_string()],
            vec![
                (2, vec![CellValue::Null, CellValue::from("$1")]),
                (3, vec![CellValue::from("2A"), CellValue::from("$2")]),
            ],
        )
        .unwrap();

        assert_eq!(table.row_count(), 1);
        assert_eq!(table.skipped_rows, 1);
    }
}

//! Untyped tables and column type inference

use std::borrow::Cow;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rustc_hash::FxHashSet;

use crate::config::ReadOptions;
use crate::error::{LoadError, Result};
use crate::model::{CellType, CellValue, Column, KeyedTable};

/// A header and the raw text fields of every row, before typing
#[derive(Debug, Clone)]
pub struct RawTable {
    pub source: PathBuf,
    pub headers: Vec<String>,
    /// `(source_line, fields)`; rows may be shorter than the header
    pub rows: Vec<(usize, Vec<String>)>,
}

impl RawTable {
    /// Validate the header and wrap the rows
    pub fn new(
        source: impl Into<PathBuf>,
        headers: Vec<String>,
        rows: Vec<(usize, Vec<String>)>,
    ) -> Result<Self> {
        let source = source.into();
        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(LoadError::EmptyHeader { path: source }.into());
        }

        let mut seen = FxHashSet::default();
        if let Some(dup) = headers.iter().find(|&h| !seen.insert(h.as_str())) {
            return Err(LoadError::DuplicateColumn {
                column: dup.clone(),
                path: source,
            }
            .into());
        }

        Ok(Self {
            source,
            headers,
            rows,
        })
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Widen each column's type over all of its cells
    pub fn infer_types(&self, options: &ReadOptions) -> Vec<CellType> {
        let mut types = vec![CellType::Null; self.width()];
        for (_, fields) in &self.rows {
            for (ty, field) in types.iter_mut().zip(fields.iter()) {
                *ty = ty.widen(CellType::of(&parse_cell_value(field, options)));
            }
        }
        types
    }

    /// Coerce every row to `types` and index it by `key_columns`
    pub fn into_keyed(
        self,
        key_columns: &[String],
        types: &[CellType],
        options: &ReadOptions,
    ) -> Result<KeyedTable> {
        let width = self.width();
        let columns: Vec<Column> = self
            .headers
            .iter()
            .zip(types.iter())
            .enumerate()
            .map(|(i, (name, ty))| Column::with_type(name.clone(), i, *ty))
            .collect();
        log::debug!(
            "{}: column types [{}]",
            self.source.display(),
            columns
                .iter()
                .map(|c| format!("{}: {}", c.name, c.inferred_type))
                .collect::<Vec<_>>()
                .join(", ")
        );

        let rows = self.rows.into_iter().map(|(line, fields)| {
            let mut cells: Vec<CellValue> = fields
                .iter()
                .zip(types.iter())
                .map(|(field, ty)| coerce_cell(field, *ty, options))
                .collect();
            // Pad with nulls if row has fewer columns
            cells.resize(width, CellValue::Null);
            (line, cells)
        });

        let table = KeyedTable::build(self.source, columns, key_columns, rows)?;
        log::debug!(
            "Loaded {} rows x {} columns from {}",
            table.row_count(),
            table.column_count(),
            table.source.display()
        );
        Ok(table)
    }
}

/// Give columns sharing a name one type across both tables
pub fn unify_types(
    left: &RawTable,
    left_types: &mut [CellType],
    right: &RawTable,
    right_types: &mut [CellType],
) {
    for (l, name) in left.headers.iter().enumerate() {
        if let Some(r) = right.headers.iter().position(|h| h == name) {
            let merged = left_types[l].widen(right_types[r]);
            left_types[l] = merged;
            right_types[r] = merged;
        }
    }
}

/// Parse a string value into a CellValue with type inference
fn parse_cell_value(s: &str, options: &ReadOptions) -> CellValue {
    if options.is_null(s) {
        return CellValue::Null;
    }
    if !options.infer_types {
        return CellValue::String(Cow::Owned(s.to_string()));
    }

    let trimmed = s.trim();

    if trimmed.eq_ignore_ascii_case("true") {
        return CellValue::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return CellValue::Bool(false);
    }

    if let Ok(i) = trimmed.parse::<i64>() {
        return CellValue::Int(i);
    }

    if let Ok(f) = trimmed.parse::<f64>() {
        return CellValue::Float(f);
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return CellValue::Date(date);
    }

    // ISO 8601 with either separator
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return CellValue::DateTime(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return CellValue::DateTime(dt);
    }

    CellValue::String(Cow::Owned(s.to_string()))
}

/// Convert a raw field to its column's type
fn coerce_cell(field: &str, column_type: CellType, options: &ReadOptions) -> CellValue {
    let value = parse_cell_value(field, options);
    if value.is_null() {
        return value;
    }
    match (column_type, value) {
        (ty, _) if ty.is_textual() => CellValue::String(Cow::Owned(field.to_string())),
        (CellType::Float, CellValue::Int(i)) => CellValue::Float(i as f64),
        (CellType::DateTime, CellValue::Date(d)) => CellValue::DateTime(d.and_time(NaiveTime::MIN)),
        (_, value) => value,
    }
}

//! Loader layer turning delimited files into keyed tables

mod csv;
mod raw;

use std::path::Path;

use crate::config::ReadOptions;
use crate::error::Result;
use crate::model::KeyedTable;

pub use self::csv::CsvLoader;
pub use self::raw::{unify_types, RawTable};

/// Source of keyed tables
pub trait TableLoader: Send + Sync {
    /// Read `path` as a header and untyped rows
    fn read(&self, path: &Path, options: &ReadOptions) -> Result<RawTable>;

    /// Load `path` indexed by `key_columns`, typing columns from its own cells
    fn load(&self, path: &Path, key_columns: &[String], options: &ReadOptions) -> Result<KeyedTable> {
        let raw = self.read(path, options)?;
        let types = raw.infer_types(options);
        raw.into_keyed(key_columns, &types, options)
    }

    /// Load two tables so that columns present in both get the same type
    fn load_pair(
        &self,
        left: &Path,
        right: &Path,
        key_columns: &[String],
        options: &ReadOptions,
    ) -> Result<(KeyedTable, KeyedTable)> {
        let left = self.read(left, options)?;
        let right = self.read(right, options)?;
        let mut left_types = left.infer_types(options);
        let mut right_types = right.infer_types(options);
        unify_types(&left, &mut left_types, &right, &mut right_types);

        Ok((
            left.into_keyed(key_columns, &left_types, options)?,
            right.into_keyed(key_columns, &right_types, options)?,
        ))
    }
}

//! Diff engine for comparing keyed tables

pub mod cell_diff;
mod result;
mod row_diff;
mod schema_diff;

use std::fmt;

use indexmap::IndexMap;

use crate::config::Config;
use crate::error::Result;
use crate::loader::{CsvLoader, TableLoader};
use crate::model::{KeyedTable, Record, RowKey};

pub use cell_diff::{rows_changed, RowComparator};
pub use result::{DiffResult, DiffStats, FieldChange, FlattenKey, TextKeyedDiff};
pub use row_diff::{rows_added, rows_only_in, rows_removed, RowMatcher, RowMatches};
pub use schema_diff::{columns_added, columns_only_in, columns_removed};

/// Both tables, once loaded
#[derive(Debug)]
struct LoadedTables {
    left: KeyedTable,
    right: KeyedTable,
}

/// Main diff engine.
///
/// Tables are loaded on the first facet request and reused by every later
/// one; the assembled [`DiffResult`] is computed once.
pub struct DiffEngine {
    config: Config,
    loader: Box<dyn TableLoader>,
    tables: Option<LoadedTables>,
    diffs: Option<DiffResult>,
}

impl DiffEngine {
    /// Create a new diff engine reading delimited files
    pub fn new(config: Config) -> Self {
        Self::with_loader(config, Box::new(CsvLoader))
    }

    pub fn with_loader(config: Config, loader: Box<dyn TableLoader>) -> Self {
        Self {
            config,
            loader,
            tables: None,
            diffs: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.tables.is_some()
    }

    fn loaded(&mut self) -> Result<&LoadedTables> {
        let tables = match self.tables.take() {
            Some(tables) => tables,
            None => {
                let config = &self.config;
                log::debug!(
                    "Loading {} and {} keyed by {:?}",
                    config.left_file.display(),
                    config.right_file.display(),
                    config.key_columns
                );
                let (left, right) = self.loader.load_pair(
                    &config.left_file,
                    &config.right_file,
                    &config.key_columns,
                    &config.read_options,
                )?;
                LoadedTables { left, right }
            }
        };
        Ok(&*self.tables.insert(tables))
    }

    pub fn left_table(&mut self) -> Result<&KeyedTable> {
        Ok(&self.loaded()?.left)
    }

    pub fn right_table(&mut self) -> Result<&KeyedTable> {
        Ok(&self.loaded()?.right)
    }

    /// Columns in right but not left, right order
    pub fn columns_added(&mut self) -> Result<Vec<String>> {
        let tables = self.loaded()?;
        Ok(columns_added(&tables.left, &tables.right))
    }

    /// Columns in left but not right, left order
    pub fn columns_removed(&mut self) -> Result<Vec<String>> {
        let tables = self.loaded()?;
        Ok(columns_removed(&tables.left, &tables.right))
    }

    /// Right rows whose key is not in left
    pub fn rows_added(&mut self) -> Result<IndexMap<RowKey, Record>> {
        let tables = self.loaded()?;
        Ok(rows_added(&tables.left, &tables.right))
    }

    /// Left rows whose key is not in right
    pub fn rows_removed(&mut self) -> Result<IndexMap<RowKey, Record>> {
        let tables = self.loaded()?;
        Ok(rows_removed(&tables.left, &tables.right))
    }

    /// Field changes for keys in both tables, over common columns
    pub fn rows_changed(&mut self) -> Result<IndexMap<RowKey, Vec<FieldChange>>> {
        let tables = self.loaded()?;
        Ok(rows_changed(&tables.left, &tables.right))
    }

    /// All facets, assembled once
    pub fn diffs(&mut self) -> Result<&DiffResult> {
        let diffs = match self.diffs.take() {
            Some(diffs) => diffs,
            None => {
                let tables = self.loaded()?;
                compute_diff(&tables.left, &tables.right)
            }
        };
        Ok(&*self.diffs.insert(diffs))
    }
}

impl fmt::Debug for DiffEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiffEngine")
            .field("left_file", &self.config.left_file)
            .field("right_file", &self.config.right_file)
            .field("key_columns", &self.config.key_columns)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

/// Compute every facet for two loaded tables
pub fn compute_diff(left: &KeyedTable, right: &KeyedTable) -> DiffResult {
    let result = DiffResult {
        row_key: left.key_columns.clone(),
        rows_added: rows_added(left, right),
        rows_removed: rows_removed(left, right),
        rows_changed: rows_changed(left, right),
        columns_added: columns_added(left, right),
        columns_removed: columns_removed(left, right),
    };
    log::debug!("Computed diff: {:?}", result.stats());
    result
}

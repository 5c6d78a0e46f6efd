//! tablediff - Keyed diff for delimited tabular data
//!
//! Compares a "left" and a "right" delimited file that share one or more key
//! columns and reports added/removed columns, added/removed rows, and
//! field-level changes for the rows and columns both files have in common.

pub mod config;
pub mod diff;
pub mod error;
pub mod loader;
pub mod model;
pub mod output;

pub use config::{Config, ReadOptions};
pub use diff::{compute_diff, DiffEngine, DiffResult, TextKeyedDiff};
pub use error::{DiffError, Result};
pub use model::{CellValue, KeyedTable, RowKey};

//! Data model for keyed tabular data

mod key;
mod schema;
mod table;

pub use key::{KeyBuilder, RowKey, MULTI_COL_KEY_SEP};
pub use schema::{CellType, Column};
pub use table::{format_float, CellValue, KeyedTable, Record, Row};

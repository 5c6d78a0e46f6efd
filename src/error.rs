//! Error types for tablediff

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DiffError>;

/// Failure to turn a source file into a keyed table
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid delimited data in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("No header row in {}", path.display())]
    EmptyHeader { path: PathBuf },

    #[error("Duplicate column name {column:?} in header of {}", path.display())]
    DuplicateColumn { path: PathBuf, column: String },

    #[error("Row {line} of {} has {found} fields, header has {expected}", path.display())]
    RaggedRow {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Duplicate key {key} in {} (lines {first_line} and {line})", path.display())]
    DuplicateKey {
        path: PathBuf,
        key: String,
        first_line: usize,
        line: usize,
    },
}

/// Requested key columns that cannot be resolved against a header
#[derive(Debug, Error)]
pub enum KeyColumnError {
    #[error("At least one key column is required")]
    NoKeyColumns,

    #[error("Key column(s) {} not found in {}", columns.join(", "), path.display())]
    Missing { path: PathBuf, columns: Vec<String> },
}

#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("Failed to serialize to JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Serialized output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Error)]
pub enum DiffError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    KeyColumn(#[from] KeyColumnError),

    #[error(transparent)]
    Serialization(#[from] SerializationError),
}

impl LoadError {
    /// Path of the source that failed to load
    pub fn path(&self) -> &PathBuf {
        match self {
            LoadError::FileNotFound { path }
            | LoadError::Read { path, .. }
            | LoadError::Csv { path, .. }
            | LoadError::EmptyHeader { path }
            | LoadError::DuplicateColumn { path, .. }
            | LoadError::RaggedRow { path, .. }
            | LoadError::DuplicateKey { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_message_names_columns_and_path() {
        let err = KeyColumnError::Missing {
            path: PathBuf::from("left.csv"),
            columns: vec!["id".to_string(), "name".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Key column(s) id, name not found in left.csv"
        );
    }

    #[test]
    fn test_diff_error_is_transparent() {
        let err: DiffError = LoadError::FileNotFound {
            path: PathBuf::from("missing.csv"),
        }
        .into();
        assert_eq!(err.to_string(), "File not found: missing.csv");
    }
}

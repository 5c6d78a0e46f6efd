//! Delimited file loader

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::config::ReadOptions;
use crate::error::{LoadError, Result};

use super::{RawTable, TableLoader};

/// Loader for CSV, TSV and other single-character delimited files
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvLoader;

impl TableLoader for CsvLoader {
    fn read(&self, path: &Path, options: &ReadOptions) -> Result<RawTable> {
        if !path.exists() {
            return Err(LoadError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }
        let file = File::open(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let csv_error = |source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut csv_reader = ::csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(options.delimiter_for(path))
            .quote(options.quote)
            .trim(if options.trim {
                ::csv::Trim::All
            } else {
                ::csv::Trim::None
            })
            .from_reader(BufReader::new(file));

        let headers: Vec<String> = csv_reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(str::to_string)
            .collect();
        let width = headers.len();

        // Read rows
        let mut rows: Vec<(usize, Vec<String>)> = Vec::new();
        for (line_num, result) in csv_reader.records().enumerate() {
            let record = result.map_err(csv_error)?;
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(line_num + 2); // +2 for 1-indexing and header
            if record.len() > width {
                return Err(LoadError::RaggedRow {
                    path: path.to_path_buf(),
                    line,
                    expected: width,
                    found: record.len(),
                }
                .into());
            }
            rows.push((line, record.iter().map(str::to_string).collect()));
        }

        RawTable::new(path, headers, rows)
    }
}

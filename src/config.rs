//! Configuration handling for tablediff

use std::path::{Path, PathBuf};

/// Output format for diff results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "json-pretty" => Ok(OutputFormat::JsonPretty),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Markers read as a missing value unless overridden
pub const DEFAULT_NULL_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Options passed through to the table loader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    /// Field delimiter; detected from the file extension when unset
    pub delimiter: Option<u8>,
    /// Quote character
    pub quote: u8,
    /// Trim leading/trailing whitespace from every field
    pub trim: bool,
    /// Infer column types; when false every non-null cell is a string
    pub infer_types: bool,
    /// Field values read as missing
    pub null_values: Vec<String>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            quote: b'"',
            trim: false,
            infer_types: true,
            null_values: DEFAULT_NULL_VALUES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ReadOptions {
    /// Delimiter to use for `path`
    pub fn delimiter_for(&self, path: &Path) -> u8 {
        if let Some(delimiter) = self.delimiter {
            return delimiter;
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "tsv" | "tab" => b'\t',
            "psv" => b'|',
            _ => b',',
        }
    }

    /// Check whether a raw field is a missing-value marker
    pub fn is_null(&self, field: &str) -> bool {
        self.null_values.iter().any(|n| n == field)
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    pub fn with_infer_types(mut self, infer: bool) -> Self {
        self.infer_types = infer;
        self
    }

    pub fn with_null_values(mut self, values: Vec<String>) -> Self {
        self.null_values = values;
        self
    }
}

/// Configuration for a comparison run
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Path to the left file
    pub left_file: PathBuf,
    /// Path to the right file
    pub right_file: PathBuf,
    /// Columns forming the row key, in key order
    pub key_columns: Vec<String>,
    /// Output format
    pub output_format: OutputFormat,
    /// Write output here instead of stdout
    pub output: Option<PathBuf>,
    /// Reader options shared by both files
    pub read_options: ReadOptions,
}

impl Config {
    /// Create a new Config with file paths
    pub fn new(left_file: impl Into<PathBuf>, right_file: impl Into<PathBuf>) -> Self {
        Self {
            left_file: left_file.into(),
            right_file: right_file.into(),
            ..Default::default()
        }
    }

    /// Set key columns for row matching
    pub fn with_key_columns<S: Into<String>>(mut self, keys: impl IntoIterator<Item = S>) -> Self {
        self.key_columns = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Set output format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set output file
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Set reader options
    pub fn with_read_options(mut self, options: ReadOptions) -> Self {
        self.read_options = options;
        self
    }
}

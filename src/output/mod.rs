//! Output formatting for diff results

pub mod json;
pub mod text;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::OutputFormat;
use crate::diff::TextKeyedDiff;

pub use json::JsonOutput;
pub use text::TextOutput;

/// Trait for output formatters
pub trait OutputFormatter {
    /// Render diff result to a writer
    fn render(&self, diff: &TextKeyedDiff, writer: &mut dyn Write) -> Result<()>;
}

/// Factory for creating output formatters
pub struct OutputFactory;

impl OutputFactory {
    /// Create an output formatter based on format type
    pub fn create(format: OutputFormat) -> Box<dyn OutputFormatter> {
        match format {
            OutputFormat::Text => Box::new(TextOutput::new()),
            OutputFormat::Json => Box::new(JsonOutput::new()),
            OutputFormat::JsonPretty => Box::new(JsonOutput::pretty()),
        }
    }
}

/// Render diff result to `output`, or stdout when unset
pub fn render_to(diff: &TextKeyedDiff, format: OutputFormat, output: Option<&Path>) -> Result<()> {
    let formatter = OutputFactory::create(format);
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            formatter.render(diff, &mut writer)?;
            writer
                .flush()
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            log::debug!("Wrote diff to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            formatter.render(diff, &mut lock)?;
        }
    }
    Ok(())
}

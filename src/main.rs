//! tablediff - Keyed diff for delimited tabular data

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use tablediff::config::{Config, OutputFormat, ReadOptions};
use tablediff::diff::DiffEngine;
use tablediff::output::render_to;

/// Compare delimited files that share a common key
#[derive(Parser, Debug)]
#[command(name = "tablediff")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Filepath to the 'left' file for compare
    left_path: PathBuf,

    /// Filepath to the 'right' file for compare
    right_path: PathBuf,

    /// Common key column(s) between the left and right files
    #[arg(required = true)]
    key: Vec<String>,

    /// Render results as JSON
    #[arg(long)]
    json: bool,

    /// Indent JSON output (implies --json)
    #[arg(long)]
    pretty: bool,

    /// Output file for compare results
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Field delimiter (detected from the file extension by default)
    #[arg(short, long, value_parser = parse_delimiter)]
    delimiter: Option<u8>,

    /// Read every cell as text instead of inferring column types
    #[arg(long)]
    no_infer: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_delimiter(s: &str) -> std::result::Result<u8, String> {
    match s {
        "\\t" | "tab" => Ok(b'\t'),
        _ if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        _ => Err(format!("delimiter must be a single ASCII character, got {:?}", s)),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut read_options = ReadOptions::default().with_infer_types(!cli.no_infer);
    if let Some(delimiter) = cli.delimiter {
        read_options = read_options.with_delimiter(delimiter);
    }

    let mut config = Config::new(&cli.left_path, &cli.right_path)
        .with_key_columns(cli.key)
        .with_output_format(match (cli.json, cli.pretty) {
            (_, true) => OutputFormat::JsonPretty,
            (true, false) => OutputFormat::Json,
            (false, false) => OutputFormat::Text,
        })
        .with_read_options(read_options);
    if let Some(output) = cli.output {
        config = config.with_output(output);
    }

    let mut engine = DiffEngine::new(config.clone());
    let diffs = engine.diffs().with_context(|| {
        format!(
            "Failed to compare {} with {}",
            config.left_file.display(),
            config.right_file.display()
        )
    })?;

    let stats = diffs.stats();
    log::info!(
        "{} rows added, {} removed, {} changed ({} cells); {} columns added, {} removed",
        stats.rows_added,
        stats.rows_removed,
        stats.rows_changed,
        stats.cells_changed,
        stats.columns_added,
        stats.columns_removed
    );

    render_to(
        &diffs.to_text_keyed(),
        config.output_format,
        config.output.as_deref(),
    )
}

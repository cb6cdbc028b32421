//! CLI entry point for the tabular transformers.

use anyhow::{Result, anyhow};
use clap::Parser;
use dotenv::dotenv;
use lex_transformers::{
    ColumnSelector, DummyEncoder, DummyEncoderConfig, LabelEncoder, Pipeline, TransformError,
};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Column selection, label encoding and dummy encoding for CSV data",
    long_about = "Applies pipeline-ready tabular transformers to a CSV file.\n\n\
                  Steps run in this order: select/drop -> label-encode -> dummies.\n\n\
                  EXAMPLES:\n  \
                  # One-hot encode two columns\n  \
                  lex-transform -i data.csv --dummies color,size -o encoded.csv\n\n  \
                  # Encode every remaining column after dropping the id\n  \
                  lex-transform -i data.csv --drop id --dummies --drop-first\n\n  \
                  # Label-encode the target and print a JSON summary\n  \
                  lex-transform -i data.csv --label-encode species --json"
)]
struct Args {
    /// Path to the CSV file to transform
    #[arg(short, long)]
    input: PathBuf,

    /// Output CSV path (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Keep only these columns, in this order
    #[arg(long, value_delimiter = ',', conflicts_with = "drop")]
    select: Vec<String>,

    /// Drop these columns
    #[arg(long, value_delimiter = ',')]
    drop: Vec<String>,

    /// Label-encode this column
    #[arg(long)]
    label_encode: Option<String>,

    /// Dummy-encode these columns (no value: every column)
    #[arg(long, value_delimiter = ',', num_args = 0..)]
    dummies: Option<Vec<String>>,

    /// Omit the first category's indicator of each encoded column
    #[arg(long, requires = "dummies")]
    drop_first: bool,

    /// Prefix for generated column names (default: the source column name)
    #[arg(long, requires = "dummies")]
    prefix: Option<String>,

    /// Separator between prefix and category
    #[arg(long, default_value = "_")]
    prefix_sep: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors)
    #[arg(short, long)]
    quiet: bool,

    /// Print a JSON summary to stdout instead of CSV
    ///
    /// Disables all logs so stdout only contains JSON.
    #[arg(long)]
    json: bool,
}

/// Machine-readable result printed with `--json`.
#[derive(Serialize)]
struct RunSummary<'a> {
    success: bool,
    input: String,
    output: Option<String>,
    steps: Vec<&'static str>,
    shape_before: Option<(usize, usize)>,
    shape_after: Option<(usize, usize)>,
    columns: Vec<String>,
    error: Option<&'a TransformError>,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    // Logs go to stderr; stdout may carry the CSV
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    // .env may set RUST_LOG
    dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    if !args.input.exists() {
        return Err(anyhow!("Input file not found: {}", args.input.display()));
    }

    info!("Loading dataset from: {}", args.input.display());
    let data = load_csv(&args.input)?;
    info!("Dataset loaded successfully: {:?}", data.shape());

    let pipeline = build_pipeline(&args)?;
    info!("Running steps: {:?}", pipeline.step_names());

    match pipeline.fit_transform(&data) {
        Ok(mut transformed) => {
            info!("Transformed shape: {:?}", transformed.shape());
            if let Some(path) = &args.output {
                let mut file = File::create(path)?;
                write_csv(&mut file, &mut transformed)?;
                info!("Dataset saved: {}", path.display());
            } else if !args.json {
                write_csv(&mut std::io::stdout().lock(), &mut transformed)?;
            }

            if args.json {
                let summary = RunSummary {
                    success: true,
                    input: args.input.display().to_string(),
                    output: args.output.as_ref().map(|p| p.display().to_string()),
                    steps: pipeline.step_names(),
                    shape_before: Some(data.shape()),
                    shape_after: Some(transformed.shape()),
                    columns: lex_transformers::utils::column_names(&transformed),
                    error: None,
                };
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            Ok(())
        }
        Err(e) => {
            if args.json {
                let summary = RunSummary {
                    success: false,
                    input: args.input.display().to_string(),
                    output: None,
                    steps: pipeline.step_names(),
                    shape_before: Some(data.shape()),
                    shape_after: None,
                    columns: Vec::new(),
                    error: Some(&e),
                };
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            error!("Transform failed: {}", e);
            Err(anyhow!("Transform failed: {}", e))
        }
    }
}

/// Build the step list from the CLI flags.
fn build_pipeline(args: &Args) -> Result<Pipeline> {
    let mut builder = Pipeline::builder();

    if !args.select.is_empty() {
        builder = builder.step(ColumnSelector::keep(args.select.iter().cloned())?);
    }
    if !args.drop.is_empty() {
        builder = builder.step(ColumnSelector::drop(args.drop.iter().cloned())?);
    }
    if let Some(column) = &args.label_encode {
        builder = builder.step(LabelEncoder::for_column(column));
    }
    if let Some(columns) = &args.dummies {
        let mut config = DummyEncoderConfig::builder()
            .columns(columns.iter().cloned())
            .drop_first(args.drop_first)
            .prefix_sep(&args.prefix_sep);
        if let Some(prefix) = &args.prefix {
            config = config.prefix(prefix);
        }
        builder = builder.step(DummyEncoder::new(config.build()?)?);
    }

    let pipeline = builder.build();
    if pipeline.is_empty() {
        debug!("No steps requested; output equals input");
    }
    Ok(pipeline)
}

fn load_csv(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
        .map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e))
}

fn write_csv<W: std::io::Write>(writer: &mut W, df: &mut DataFrame) -> Result<()> {
    CsvWriter::new(writer)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(df)?;
    Ok(())
}

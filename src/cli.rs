use std::path::PathBuf;

use clap::Parser;

use crate::analysis::DEFAULT_QUANTILE;

/// Filter a property listing export and flag listings priced below the
/// price-per-area trend.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Listing file (.csv, .json or .parquet)
    pub input: PathBuf,

    /// JSON file with filter criteria, e.g. {"min_beds": 3, "price": {"min": 0, "max": 600000}}
    #[arg(long)]
    pub filters: Option<PathBuf>,

    /// Residual quantile below which listings are flagged as undervalued
    #[arg(long, default_value_t = DEFAULT_QUANTILE)]
    pub quantile: f64,

    /// Comma-separated columns to display (default: all)
    #[arg(long, value_delimiter = ',')]
    pub columns: Option<Vec<String>>,

    /// Write the annotated table as CSV to this path
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Print the analysis summary as JSON instead of tables
    #[arg(long)]
    pub summary_json: bool,
}

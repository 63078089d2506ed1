use std::fs::File;
use std::io::BufWriter;

use anyhow::{Context, Result};
use clap::Parser;

use rusty_realty::cli::Cli;
use rusty_realty::data::loader;
use rusty_realty::report::{self, Summary, TREND_LINE_SAMPLES};
use rusty_realty::state::ListingState;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let raw = loader::load_file(&cli.input)
        .with_context(|| format!("loading {}", cli.input.display()))?;
    let mut state = ListingState::new(raw);
    state.quantile = cli.quantile;

    if let Some(path) = &cli.filters {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading filter file {}", path.display()))?;
        let overrides: serde_json::Value =
            serde_json::from_str(&text).context("parsing filter file")?;
        let criteria = state
            .criteria
            .merged_with(&overrides)
            .context("invalid filter criteria")?;
        state.set_criteria(criteria);
    }
    if let Some(columns) = &cli.columns {
        state.show_only(columns);
    }

    let detection = match state.analyze() {
        Ok(d) => d,
        Err(e) => {
            log::error!("Analysis stopped: {e}");
            return Err(e.into());
        }
    };

    if let Some(path) = &cli.out {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        report::write_csv(&detection.table, BufWriter::new(file))?;
        log::info!("Wrote annotated table to {}", path.display());
    }

    let summary = Summary::from_detection(&detection);
    if cli.summary_json {
        let line = report::trend_line(detection.fit.as_ref(), &detection.table, TREND_LINE_SAMPLES);
        let payload = serde_json::json!({
            "summary": summary,
            "series": report::scatter_series(&detection.table),
            "trend_line": line,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("Showing {} properties after filtering.", summary.filtered_rows);
    match &summary.fit {
        Some(fit) => println!(
            "Trend: price/sqft = {:.6} * sqft + {:.2}  (fitted on {} listings)",
            fit.slope, fit.intercept, summary.valid_rows
        ),
        None => println!("Not enough listings with price and size to fit a trend."),
    }

    println!("\nFiltered Properties");
    println!("{}", report::render_table(&detection.table, &state.result_columns())?);

    println!("\nUndervalued Properties");
    let undervalued = detection.undervalued();
    if undervalued.is_empty() {
        println!("No undervalued properties found with current filters.");
    } else {
        println!("{}", report::render_table(&undervalued, &state.visible_columns())?);
    }

    Ok(())
}

use std::collections::HashMap;

use crate::data::model::{
    AREA, CellValue, PRICE, PRICE_PER_AREA, PropertyRow, PropertyTable, RowId, UNDERVALUED,
};
use crate::error::AnalysisError;

use super::regression::{TrendFit, fit_line, quantile};

/// Fraction of the residual distribution flagged by default (bottom 10%).
pub const DEFAULT_QUANTILE: f64 = 0.1;

/// Output of [`detect`]: the annotated table plus the fitted trend.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Input rows, in order, with `PRICE_PER_SQFT` and `UNDERVALUED` set.
    pub table: PropertyTable,
    /// `None` when at most one row was eligible for fitting.
    pub fit: Option<TrendFit>,
    /// Residual cut-off; rows strictly below it are flagged.
    pub threshold: Option<f64>,
    /// Number of rows that took part in the fit.
    pub valid_rows: usize,
}

impl Detection {
    pub fn undervalued_count(&self) -> usize {
        self.flagged_rows().count()
    }

    /// Rows flagged as undervalued, in table order.
    pub fn undervalued(&self) -> PropertyTable {
        PropertyTable {
            columns: self.table.columns.clone(),
            rows: self.flagged_rows().cloned().collect(),
        }
    }

    fn flagged_rows(&self) -> impl Iterator<Item = &PropertyRow> {
        let idx = self.table.column_index(UNDERVALUED);
        self.table.rows.iter().filter(move |r| {
            idx.and_then(|i| r.cells.get(i))
                .and_then(CellValue::as_bool)
                .unwrap_or(false)
        })
    }
}

/// Price per unit area, `0` when the area is not positive or the ratio
/// overflows.
pub fn price_per_area(price: f64, area: f64) -> f64 {
    if area <= 0.0 {
        return 0.0;
    }
    let ratio = price / area;
    if ratio.is_finite() { ratio } else { 0.0 }
}

/// Flag listings priced below the price-per-area trend.
///
/// Fits `price_per_area ~ area` over rows with positive area and positive
/// price per area, then flags those whose residual falls strictly below the
/// `quantile`-th residual quantile. Every other row is left unflagged.
/// Existing derived columns are overwritten; all other columns pass through.
pub fn detect(table: &PropertyTable, quantile_q: f64) -> Result<Detection, AnalysisError> {
    if !(quantile_q > 0.0 && quantile_q < 1.0) {
        return Err(AnalysisError::InvalidQuantile(quantile_q));
    }

    let missing: Vec<String> = [PRICE, AREA]
        .into_iter()
        .filter(|c| !table.has_column(c))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(AnalysisError::MissingRequiredFields { missing });
    }

    let prices = numeric_or_zero(table, PRICE);
    let areas = numeric_or_zero(table, AREA);
    let ppa: Vec<f64> = prices
        .iter()
        .zip(&areas)
        .map(|(&p, &a)| price_per_area(p, a))
        .collect();

    // (row id, area, price per area) for rows eligible for the fit
    let valid: Vec<(RowId, f64, f64)> = table
        .rows
        .iter()
        .zip(areas.iter().zip(&ppa))
        .filter(|&(_, (&a, &y))| a > 0.0 && y > 0.0)
        .map(|(row, (&a, &y))| (row.id, a, y))
        .collect();

    let mut flags: HashMap<RowId, bool> = HashMap::new();
    let mut fit = None;
    let mut threshold = None;

    if valid.len() > 1 {
        let xs: Vec<f64> = valid.iter().map(|v| v.1).collect();
        let ys: Vec<f64> = valid.iter().map(|v| v.2).collect();
        fit = fit_line(&xs, &ys);

        if let Some(line) = fit {
            let residuals: Vec<f64> = valid.iter().map(|&(_, x, y)| y - line.predict(x)).collect();
            threshold = quantile(&residuals, quantile_q).filter(|t| t.is_finite());
            if let Some(cut) = threshold {
                flags.extend(valid.iter().zip(&residuals).map(|(v, &r)| (v.0, r < cut)));
            }
            log::debug!(
                "Trend fit over {} rows: slope={:.6} intercept={:.3} threshold={:?}",
                valid.len(),
                line.slope,
                line.intercept,
                threshold
            );
        }
    } else {
        log::info!(
            "Only {} row(s) with positive area and price; skipping trend fit",
            valid.len()
        );
    }

    let mut out = table.clone();
    out.set_column(PRICE_PER_AREA, ppa.into_iter().map(CellValue::Float));
    let flagged: Vec<CellValue> = out
        .rows
        .iter()
        .map(|r| CellValue::Bool(flags.get(&r.id).copied().unwrap_or(false)))
        .collect();
    out.set_column(UNDERVALUED, flagged);

    Ok(Detection {
        table: out,
        fit,
        threshold,
        valid_rows: valid.len(),
    })
}

/// Values of `column` as non-negative finite numbers, anything else as 0.
fn numeric_or_zero(table: &PropertyTable, column: &str) -> Vec<f64> {
    table
        .numeric_column(column)
        .unwrap_or_default()
        .into_iter()
        .map(|v| v.filter(|v| v.is_finite() && *v > 0.0).unwrap_or(0.0))
        .collect()
}

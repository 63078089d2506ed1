use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use serde::Serialize;

use crate::analysis::{Detection, TrendFit};
use crate::data::model::{AREA, CellValue, PRICE_PER_AREA, PropertyTable, UNDERVALUED};

/// Resolution of the overlaid trend line.
pub const TREND_LINE_SAMPLES: usize = 100;

// ---------------------------------------------------------------------------
// Plot data
// ---------------------------------------------------------------------------

/// Evenly spaced `[x, y]` points of `fit` across the area range of `table`.
///
/// The range covers every row of the filtered table, including rows that
/// were excluded from the fit. Empty without a fit or without rows.
pub fn trend_line(fit: Option<&TrendFit>, table: &PropertyTable, samples: usize) -> Vec<[f64; 2]> {
    let (Some(fit), Some((lo, hi))) = (fit, table.numeric_range(AREA)) else {
        return Vec::new();
    };
    match samples {
        0 => Vec::new(),
        1 => vec![[lo, fit.predict(lo)]],
        n => {
            let step = (hi - lo) / (n - 1) as f64;
            (0..n)
                .map(|i| {
                    let x = if i == n - 1 { hi } else { lo + step * i as f64 };
                    [x, fit.predict(x)]
                })
                .collect()
        }
    }
}

/// One colour group of the scatter plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub name: &'static str,
    /// `[area, price_per_area]` per listing.
    pub points: Vec<[f64; 2]>,
}

/// Split an annotated table into "Normal" and "Undervalued" point series.
pub fn scatter_series(table: &PropertyTable) -> [ScatterSeries; 2] {
    let mut normal = ScatterSeries { name: "Normal", points: Vec::new() };
    let mut under = ScatterSeries { name: "Undervalued", points: Vec::new() };

    for row in &table.rows {
        let num = |col: &str| table.cell(row, col).and_then(CellValue::as_f64).unwrap_or(0.0);
        let point = [num(AREA), num(PRICE_PER_AREA)];
        let flagged = table
            .cell(row, UNDERVALUED)
            .and_then(CellValue::as_bool)
            .unwrap_or(false);
        if flagged {
            under.points.push(point);
        } else {
            normal.points.push(point);
        }
    }
    [normal, under]
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub filtered_rows: usize,
    pub valid_rows: usize,
    pub undervalued_rows: usize,
    pub fit: Option<TrendFit>,
    pub threshold: Option<f64>,
    /// Area range the trend line is drawn over.
    pub area_range: Option<(f64, f64)>,
}

impl Summary {
    pub fn from_detection(detection: &Detection) -> Self {
        Self {
            filtered_rows: detection.table.len(),
            valid_rows: detection.valid_rows,
            undervalued_rows: detection.undervalued_count(),
            fit: detection.fit,
            threshold: detection.threshold,
            area_range: detection.table.numeric_range(AREA),
        }
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Convert the given columns of `table` into an Arrow record batch.
///
/// Columns holding only integers become Int64, numbers Float64, booleans
/// Boolean; anything else is rendered as text. Unknown columns are skipped.
pub fn to_record_batch(table: &PropertyTable, columns: &[String]) -> Result<RecordBatch> {
    let mut fields = Vec::new();
    let mut arrays: Vec<ArrayRef> = Vec::new();

    for name in columns {
        let Some(idx) = table.column_index(name) else {
            log::warn!("Skipping unknown column '{name}'");
            continue;
        };
        let cells: Vec<&CellValue> = table.rows.iter().map(|r| &r.cells[idx]).collect();
        let (dtype, array) = column_array(&cells);
        fields.push(Field::new(name, dtype, true));
        arrays.push(array);
    }

    let schema = Arc::new(Schema::new(fields));
    RecordBatch::try_new(schema, arrays).context("building record batch")
}

fn column_array(cells: &[&CellValue]) -> (DataType, ArrayRef) {
    let present = || cells.iter().filter(|c| !is_blank(c));
    let all = |pred: fn(&CellValue) -> bool| present().all(|c| pred(c));

    if all(|c| matches!(c, CellValue::Bool(_))) && present().next().is_some() {
        let values: BooleanArray = cells.iter().map(|c| c.as_bool()).collect();
        (DataType::Boolean, Arc::new(values))
    } else if all(|c| matches!(c, CellValue::Integer(_))) && present().next().is_some() {
        let values: Int64Array = cells
            .iter()
            .map(|c| match c {
                CellValue::Integer(i) => Some(*i),
                _ => None,
            })
            .collect();
        (DataType::Int64, Arc::new(values))
    } else if all(|c| matches!(c, CellValue::Integer(_) | CellValue::Float(_)))
        && present().next().is_some()
    {
        let values: Float64Array = cells
            .iter()
            .map(|c| if is_blank(c) { None } else { c.as_f64() })
            .collect();
        (DataType::Float64, Arc::new(values))
    } else {
        let values: StringArray = cells.iter().map(|c| Some(c.to_string())).collect();
        (DataType::Utf8, Arc::new(values))
    }
}

fn is_blank(cell: &CellValue) -> bool {
    match cell {
        CellValue::Null => true,
        CellValue::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Render the given columns of `table` as a boxed text table.
pub fn render_table(table: &PropertyTable, columns: &[String]) -> Result<String> {
    if columns.is_empty() {
        return Ok(String::new());
    }
    let batch = to_record_batch(table, columns)?;
    Ok(pretty_format_batches(&[batch])
        .context("formatting table")?
        .to_string())
}

/// Write the full annotated table as CSV.
pub fn write_csv<W: Write>(table: &PropertyTable, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(&table.columns)
        .context("writing CSV header")?;
    for row in &table.rows {
        writer
            .write_record(row.cells.iter().map(|c| c.to_string()))
            .with_context(|| format!("writing CSV row {}", row.id))?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{DEFAULT_QUANTILE, detect};
    use crate::data::model::PRICE;

    fn annotated() -> Detection {
        let mut t = PropertyTable::new(vec!["ADDRESS".into(), PRICE.into(), AREA.into()]);
        for (addr, price, area) in [
            ("1 Elm", 200_000.0, 1000.0),
            ("2 Elm", 420_000.0, 2000.0),
            ("3 Elm", 150_000.0, 1500.0),
            ("4 Elm", 620_000.0, 3000.0),
            ("lot", 50_000.0, 0.0),
        ] {
            t.push_cells(vec![
                CellValue::String(addr.into()),
                CellValue::Float(price),
                CellValue::Float(area),
            ]);
        }
        detect(&t, DEFAULT_QUANTILE).unwrap()
    }

    #[test]
    fn trend_line_spans_full_area_range() {
        let d = annotated();
        let line = trend_line(d.fit.as_ref(), &d.table, TREND_LINE_SAMPLES);
        let fit = d.fit.unwrap();

        assert_eq!(line.len(), 100);
        // the zero-area row widens the range below the fitted data
        assert_eq!(line[0], [0.0, fit.intercept]);
        assert_eq!(line[99][0], 3000.0);
        assert!((line[99][1] - fit.predict(3000.0)).abs() < 1e-9);
    }

    #[test]
    fn trend_line_edge_cases() {
        let d = annotated();
        assert!(trend_line(None, &d.table, 100).is_empty());
        assert!(trend_line(d.fit.as_ref(), &d.table, 0).is_empty());
        assert_eq!(trend_line(d.fit.as_ref(), &d.table, 1).len(), 1);
    }

    #[test]
    fn scatter_groups_by_flag() {
        let d = annotated();
        let [normal, under] = scatter_series(&d.table);
        assert_eq!(normal.points.len() + under.points.len(), 5);
        assert_eq!(under.points.len(), d.undervalued_count());
        assert!(normal.points.contains(&[0.0, 0.0]));
    }

    #[test]
    fn summary_reports_counts() {
        let d = annotated();
        let s = Summary::from_detection(&d);
        assert_eq!(s.filtered_rows, 5);
        assert_eq!(s.valid_rows, 4);
        assert_eq!(s.area_range, Some((0.0, 3000.0)));
        let json = serde_json::to_value(&s).unwrap();
        assert!(json["fit"]["slope"].is_number());
    }

    #[test]
    fn record_batch_infers_column_types() {
        let d = annotated();
        let cols: Vec<String> = vec!["ADDRESS".into(), PRICE.into(), UNDERVALUED.into(), "NOPE".into()];
        let batch = to_record_batch(&d.table, &cols).unwrap();

        assert_eq!(batch.num_columns(), 3);
        assert_eq!(batch.num_rows(), 5);
        assert_eq!(batch.schema().field(0).data_type(), &DataType::Utf8);
        assert_eq!(batch.schema().field(1).data_type(), &DataType::Float64);
        assert_eq!(batch.schema().field(2).data_type(), &DataType::Boolean);
    }

    #[test]
    fn rendered_table_lists_rows() {
        let d = annotated();
        let text = render_table(&d.table, &["ADDRESS".to_string()]).unwrap();
        assert!(text.contains("ADDRESS"));
        assert!(text.contains("4 Elm"));
        assert_eq!(render_table(&d.table, &[]).unwrap(), "");
    }

    #[test]
    fn csv_output_includes_derived_columns() {
        let d = annotated();
        let mut buf = Vec::new();
        write_csv(&d.table, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("ADDRESS,PRICE,SQFT,PRICE_PER_SQFT,UNDERVALUED")
        );
        assert_eq!(lines.next(), Some("1 Elm,200000,1000,200,false"));
    }
}

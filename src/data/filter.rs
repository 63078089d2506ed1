use serde::{Deserialize, Serialize};

use super::model::{
    BATHS, BEDS, DAYS_ON_MARKET, LOT_SIZE, PRICE, PropertyRow, PropertyTable, YEAR_BUILT,
};

// ---------------------------------------------------------------------------
// Filter criteria: explicit value object replacing widget state
// ---------------------------------------------------------------------------

/// Inclusive numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }
}

/// User-selected predicates over the listing table.
///
/// `None` ranges impose no constraint. Deserialises from JSON with every
/// field optional, e.g. `{"min_beds": 3, "price": {"min": 0, "max": 600000}}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub min_beds: f64,
    pub min_baths: f64,
    pub price: Option<Range>,
    pub year_built: Option<Range>,
    pub lot_size: Option<Range>,
    pub days_on_market: Option<Range>,
}

impl FilterCriteria {
    /// Criteria that let every row of `table` through: minimums at 0 and
    /// each range spanning the observed values of its column.
    pub fn spanning(table: &PropertyTable) -> Self {
        let range = |col: &str| table.numeric_range(col).map(|(lo, hi)| Range::new(lo, hi));
        Self {
            min_beds: 0.0,
            min_baths: 0.0,
            price: range(PRICE),
            year_built: range(YEAR_BUILT),
            lot_size: range(LOT_SIZE),
            days_on_market: range(DAYS_ON_MARKET),
        }
    }

    /// Replace the fields set in `overrides` (a JSON object) on top of `self`.
    pub fn merged_with(&self, overrides: &serde_json::Value) -> serde_json::Result<Self> {
        let mut base = serde_json::to_value(self)?;
        if let (Some(base), Some(over)) = (base.as_object_mut(), overrides.as_object()) {
            for (k, v) in over {
                base.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(base)
    }

    fn predicates(&self) -> Vec<(&'static str, Range)> {
        let mut preds = vec![
            (BEDS, Range::new(self.min_beds, f64::INFINITY)),
            (BATHS, Range::new(self.min_baths, f64::INFINITY)),
        ];
        let ranges = [
            (PRICE, self.price),
            (YEAR_BUILT, self.year_built),
            (LOT_SIZE, self.lot_size),
            (DAYS_ON_MARKET, self.days_on_market),
        ];
        preds.extend(ranges.into_iter().filter_map(|(c, r)| r.map(|r| (c, r))));
        preds
    }
}

/// Return the rows of `table` that pass all active predicates.
///
/// A predicate over a column the table lacks is skipped; a non-numeric cell
/// in a constrained column fails the predicate. Row ids and order are kept.
pub fn apply(table: &PropertyTable, criteria: &FilterCriteria) -> PropertyTable {
    let active: Vec<(usize, Range)> = criteria
        .predicates()
        .into_iter()
        .filter_map(|(col, range)| table.column_index(col).map(|idx| (idx, range)))
        .collect();

    let passes = |row: &PropertyRow| {
        active.iter().all(|(idx, range)| {
            row.cells
                .get(*idx)
                .and_then(|c| c.as_f64())
                .is_some_and(|v| range.contains(v))
        })
    };

    let rows: Vec<PropertyRow> = table.rows.iter().filter(|r| passes(r)).cloned().collect();
    log::debug!("Filter kept {} of {} rows", rows.len(), table.len());

    PropertyTable {
        columns: table.columns.clone(),
        rows,
    }
}

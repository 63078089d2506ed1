use super::model::{
    AREA, BATHS, BEDS, CellValue, DAYS_ON_MARKET, LOT_SIZE, PRICE, PropertyTable, YEAR_BUILT,
};

// ---------------------------------------------------------------------------
// Column clean-up applied right after loading
// ---------------------------------------------------------------------------

/// Source column names that are renamed on ingestion.
pub const RENAMES: &[(&str, &str)] = &[("SQUARE FEET", AREA)];

/// Export columns that carry no analysis value and are dropped.
pub const COLUMNS_TO_REMOVE: &[&str] = &["SOURCE", "FAVORITE", "INTERESTED", "LATITUDE", "LONGITUDE"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Coercion {
    Integer,
    Float,
    /// Float clamped at zero; the detector relies on these being non-negative.
    NonNegative,
}

const COERCIONS: &[(&str, Coercion)] = &[
    (BEDS, Coercion::Integer),
    (BATHS, Coercion::Float),
    (PRICE, Coercion::NonNegative),
    (AREA, Coercion::NonNegative),
    (YEAR_BUILT, Coercion::Integer),
    (LOT_SIZE, Coercion::Float),
    (DAYS_ON_MARKET, Coercion::Integer),
];

/// Normalise a freshly loaded table.
///
/// 1. rename known aliases (`SQUARE FEET` → `SQFT`)
/// 2. drop [`COLUMNS_TO_REMOVE`]
/// 3. replace nulls with empty strings
/// 4. coerce the filterable columns to numbers; anything unparseable becomes 0
pub fn normalize(mut table: PropertyTable) -> PropertyTable {
    for (from, to) in RENAMES {
        if let Some(idx) = table.column_index(from) {
            table.columns[idx] = (*to).to_string();
        }
    }

    let keep: Vec<bool> = table
        .columns
        .iter()
        .map(|c| !COLUMNS_TO_REMOVE.contains(&c.as_str()))
        .collect();
    if keep.iter().any(|k| !k) {
        table.columns = retain_flagged(std::mem::take(&mut table.columns), &keep);
        for row in &mut table.rows {
            row.cells = retain_flagged(std::mem::take(&mut row.cells), &keep);
        }
    }

    for row in &mut table.rows {
        for cell in &mut row.cells {
            if *cell == CellValue::Null {
                *cell = CellValue::String(String::new());
            }
        }
    }

    for (column, coercion) in COERCIONS {
        let Some(idx) = table.column_index(column) else {
            continue;
        };
        let mut invalid = 0usize;
        for row in &mut table.rows {
            let cell = &mut row.cells[idx];
            let (value, ok) = coerce(cell, *coercion);
            if !ok {
                invalid += 1;
            }
            *cell = value;
        }
        if invalid > 0 {
            log::warn!("{invalid} invalid value(s) in column '{column}' replaced with 0");
        }
    }

    table
}

fn retain_flagged<T>(items: Vec<T>, keep: &[bool]) -> Vec<T> {
    items
        .into_iter()
        .zip(keep)
        .filter_map(|(item, &k)| k.then_some(item))
        .collect()
}

/// Returns the coerced cell and whether the source value was usable.
/// Empty cells count as usable: they are simply missing.
fn coerce(cell: &CellValue, coercion: Coercion) -> (CellValue, bool) {
    let blank = matches!(cell, CellValue::String(s) if s.trim().is_empty());
    let parsed = cell.as_f64().filter(|v| v.is_finite());
    let ok = blank || parsed.is_some();
    let v = parsed.unwrap_or(0.0);

    let value = match coercion {
        Coercion::Integer => CellValue::Integer(v.trunc() as i64),
        Coercion::Float => CellValue::Float(v),
        Coercion::NonNegative => CellValue::Float(v.max(0.0)),
    };
    (value, ok && !(coercion == Coercion::NonNegative && v < 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv;

    fn load(data: &str) -> PropertyTable {
        normalize(read_csv(data.as_bytes()).unwrap())
    }

    #[test]
    fn renames_and_drops_columns() {
        let t = load("ADDRESS,SOURCE,PRICE,SQUARE FEET,LATITUDE\nA,MLS,100,50,47.6\n");
        assert_eq!(t.columns, vec!["ADDRESS", PRICE, AREA]);
        assert_eq!(t.rows[0].cells.len(), 3);
        assert_eq!(t.rows[0].cells[0], CellValue::String("A".into()));
    }

    #[test]
    fn coerces_known_columns_and_zero_fills_invalid() {
        let t = load(
            "BEDS,BATHS,PRICE,SQFT,YEAR BUILT,LOT SIZE,DAYS ON MARKET,NOTE\n\
             3.7,2.5,abc,,1999,0.25,12,\n\
             x,,-5,inf,,,,hi\n",
        );
        let r0 = &t.rows[0].cells;
        assert_eq!(r0[0], CellValue::Integer(3));
        assert_eq!(r0[1], CellValue::Float(2.5));
        assert_eq!(r0[2], CellValue::Float(0.0));
        assert_eq!(r0[3], CellValue::Float(0.0));
        assert_eq!(r0[4], CellValue::Integer(1999));
        assert_eq!(r0[5], CellValue::Float(0.25));
        assert_eq!(r0[6], CellValue::Integer(12));
        assert_eq!(r0[7], CellValue::String(String::new()));

        let r1 = &t.rows[1].cells;
        assert_eq!(r1[0], CellValue::Integer(0));
        assert_eq!(r1[2], CellValue::Float(0.0));
        assert_eq!(r1[3], CellValue::Float(0.0));
        assert_eq!(r1[7], CellValue::String("hi".into()));
    }

    #[test]
    fn tables_without_known_columns_pass_through() {
        let t = load("CITY,STATE\nSeattle,WA\n");
        assert_eq!(t.columns, vec!["CITY", "STATE"]);
        assert_eq!(t.rows[0].cells[1], CellValue::String("WA".into()));
    }
}

use std::fmt;

// ---------------------------------------------------------------------------
// Well-known column names
// ---------------------------------------------------------------------------

pub const PRICE: &str = "PRICE";
pub const AREA: &str = "SQFT";
pub const BEDS: &str = "BEDS";
pub const BATHS: &str = "BATHS";
pub const YEAR_BUILT: &str = "YEAR BUILT";
pub const LOT_SIZE: &str = "LOT SIZE";
pub const DAYS_ON_MARKET: &str = "DAYS ON MARKET";

/// Derived columns written by the detector.
pub const PRICE_PER_AREA: &str = "PRICE_PER_SQFT";
pub const UNDERVALUED: &str = "UNDERVALUED";

// ---------------------------------------------------------------------------
// CellValue – a single cell of the listing table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common spreadsheet dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` (numeric cells and numeric text).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Guess the type of a raw text cell.
    pub fn from_text(s: &str) -> CellValue {
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::String(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// PropertyRow – one listing
// ---------------------------------------------------------------------------

/// Stable identifier assigned at load time (the row's position in the file).
pub type RowId = usize;

/// A single listing. `cells` is aligned with [`PropertyTable::columns`].
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRow {
    pub id: RowId,
    pub cells: Vec<CellValue>,
}

// ---------------------------------------------------------------------------
// PropertyTable – the complete (or filtered) dataset
// ---------------------------------------------------------------------------

/// Ordered listing rows sharing one column schema.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyTable {
    /// Column names in source order.
    pub columns: Vec<String>,
    pub rows: Vec<PropertyRow>,
}

impl PropertyTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row, assigning the next sequential id.
    ///
    /// Short rows are padded with [`CellValue::Null`]; extra cells are dropped.
    pub fn push_cells(&mut self, mut cells: Vec<CellValue>) {
        cells.resize(self.columns.len(), CellValue::Null);
        let id = self.rows.len();
        self.rows.push(PropertyRow { id, cells });
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Value of `column` for `row`, if the column exists.
    pub fn cell<'a>(&self, row: &'a PropertyRow, column: &str) -> Option<&'a CellValue> {
        self.column_index(column).and_then(|i| row.cells.get(i))
    }

    /// Numeric view of a column; non-numeric cells read as `None`.
    pub fn numeric_column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|r| r.cells.get(idx).and_then(CellValue::as_f64))
                .collect(),
        )
    }

    /// Observed `(min, max)` of a numeric column, ignoring non-numeric cells.
    pub fn numeric_range(&self, name: &str) -> Option<(f64, f64)> {
        self.numeric_column(name)?
            .into_iter()
            .flatten()
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Set `column` on every row, appending the column when it is new.
    pub fn set_column<I>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = CellValue>,
    {
        let idx = match self.column_index(name) {
            Some(idx) => idx,
            None => {
                self.columns.push(name.to_string());
                for row in &mut self.rows {
                    row.cells.push(CellValue::Null);
                }
                self.columns.len() - 1
            }
        };
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.cells[idx] = value;
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PropertyTable {
        let mut t = PropertyTable::new(vec!["ADDRESS".into(), PRICE.into()]);
        t.push_cells(vec![CellValue::from_text("1 Main St"), CellValue::Integer(250_000)]);
        t.push_cells(vec![CellValue::from_text("2 Oak Ave")]);
        t
    }

    #[test]
    fn text_cells_are_typed() {
        assert_eq!(CellValue::from_text(""), CellValue::Null);
        assert_eq!(CellValue::from_text("42"), CellValue::Integer(42));
        assert_eq!(CellValue::from_text("2.5"), CellValue::Float(2.5));
        assert_eq!(CellValue::from_text("true"), CellValue::Bool(true));
        assert_eq!(
            CellValue::from_text("Seattle"),
            CellValue::String("Seattle".into())
        );
    }

    #[test]
    fn short_rows_are_padded_and_ids_are_sequential() {
        let t = table();
        assert_eq!(t.rows[1].cells.len(), 2);
        assert_eq!(t.rows[1].cells[1], CellValue::Null);
        assert_eq!(t.rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn set_column_appends_then_overwrites_in_place() {
        let mut t = table();
        t.set_column("FLAG", vec![CellValue::Bool(true), CellValue::Bool(false)]);
        assert_eq!(t.columns, vec!["ADDRESS", PRICE, "FLAG"]);

        t.set_column(PRICE, vec![CellValue::Float(1.0), CellValue::Float(2.0)]);
        assert_eq!(t.columns, vec!["ADDRESS", PRICE, "FLAG"]);
        assert_eq!(t.rows[1].cells[1], CellValue::Float(2.0));
    }

    #[test]
    fn numeric_range_skips_non_numeric_cells() {
        let t = table();
        assert_eq!(t.numeric_range(PRICE), Some((250_000.0, 250_000.0)));
        assert_eq!(t.numeric_range("MISSING"), None);
    }
}

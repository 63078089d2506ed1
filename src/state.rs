use std::collections::BTreeSet;

use crate::analysis::{DEFAULT_QUANTILE, Detection, detect};
use crate::data::filter::{self, FilterCriteria};
use crate::data::ingest;
use crate::data::model::{PropertyTable, UNDERVALUED};
use crate::error::AnalysisError;

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Everything a user has chosen for the current dataset, independent of any
/// front end. Each call to [`ListingState::analyze`] recomputes from scratch.
#[derive(Debug, Clone)]
pub struct ListingState {
    /// Ingested (normalised) dataset.
    pub table: PropertyTable,

    /// Current filter selections.
    pub criteria: FilterCriteria,

    /// Residual quantile below which listings are flagged.
    pub quantile: f64,

    /// Columns hidden from table output.
    hidden_columns: BTreeSet<String>,
}

impl ListingState {
    /// Normalise a freshly loaded table and initialise criteria to span it.
    pub fn new(raw: PropertyTable) -> Self {
        let table = ingest::normalize(raw);
        let criteria = FilterCriteria::spanning(&table);
        log::info!(
            "Loaded {} properties with columns {:?}",
            table.len(),
            table.columns
        );
        Self {
            table,
            criteria,
            quantile: DEFAULT_QUANTILE,
            hidden_columns: BTreeSet::new(),
        }
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
    }

    /// Flip whether `column` appears in table output.
    pub fn toggle_column(&mut self, column: &str) {
        if !self.hidden_columns.remove(column) {
            self.hidden_columns.insert(column.to_string());
        }
    }

    /// Show exactly `columns` (unknown names are ignored).
    pub fn show_only(&mut self, columns: &[String]) {
        self.hidden_columns = self
            .table
            .columns
            .iter()
            .filter(|c| !columns.contains(c))
            .cloned()
            .collect();
    }

    /// Visible source columns, in table order.
    pub fn visible_columns(&self) -> Vec<String> {
        self.table
            .columns
            .iter()
            .filter(|c| !self.hidden_columns.contains(*c))
            .cloned()
            .collect()
    }

    /// Visible columns followed by the undervalued flag.
    pub fn result_columns(&self) -> Vec<String> {
        let mut cols = self.visible_columns();
        if !cols.iter().any(|c| c == UNDERVALUED) {
            cols.push(UNDERVALUED.to_string());
        }
        cols
    }

    /// Filter the dataset with the current criteria.
    pub fn filtered(&self) -> PropertyTable {
        filter::apply(&self.table, &self.criteria)
    }

    /// Run filter → detection over the current selections.
    pub fn analyze(&self) -> Result<Detection, AnalysisError> {
        let filtered = self.filtered();
        log::info!("Showing {} properties after filtering", filtered.len());
        detect(&filtered, self.quantile)
    }
}

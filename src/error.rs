use thiserror::Error;

/// Failures of the undervaluation analysis.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    /// The table schema lacks a column the detector needs.
    #[error("missing required column(s): {}", .missing.join(", "))]
    MissingRequiredFields { missing: Vec<String> },

    #[error("quantile must lie strictly between 0 and 1, got {0}")]
    InvalidQuantile(f64),
}

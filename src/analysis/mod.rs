/// Undervaluation analysis over a filtered listing table.
///
/// ```text
///   PropertyTable (filtered)
///        │
///        ▼
///   ┌──────────┐
///   │ detector  │  price per area, valid subset, flags joined by row id
///   └──────────┘
///        │ uses
///        ▼
///   ┌────────────┐
///   │ regression  │  least-squares line, interpolated quantile
///   └────────────┘
/// ```

pub mod detector;
pub mod regression;

pub use detector::{DEFAULT_QUANTILE, Detection, detect};
pub use regression::TrendFit;

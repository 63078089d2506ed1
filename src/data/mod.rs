/// Data layer: core types, loading, clean-up and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → PropertyTable (row ids in file order)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  ingest   │  rename / drop columns, coerce numeric fields
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply FilterCriteria → filtered PropertyTable
///   └──────────┘
/// ```

pub mod filter;
pub mod ingest;
pub mod loader;
pub mod model;

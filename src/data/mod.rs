/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .parquet / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → AccidentTable
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ AccidentTable  │  Vec<Column>, required-column schema
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  Time_of_Day == value → row indices
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;

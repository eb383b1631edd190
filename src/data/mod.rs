/// Data layer: core types, report loading, and table output.
///
/// Architecture:
/// ```text
///  .zip / directory / .rpt
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read entries → Vec<Report> (sorted by name)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ analysis  │  parse → classify → select → pair
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  writer   │  SampleRow / SignificanceRow → .csv / .json / .parquet
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod writer;

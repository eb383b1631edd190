//! Report analysis: record parsing, chain grouping, line selection and
//! replicate significance.
//!
//! Every stage here is infallible; a missing or malformed value becomes an
//! absent field in the output row instead of an error.

pub mod batch;
pub mod classify;
pub mod parser;
pub mod select;
pub mod significance;

pub use batch::{process_report, process_reports};
pub use classify::classify_chain;
pub use parser::parse_identified;
pub use select::select_line;
pub use significance::{compute_significance, PairKey};

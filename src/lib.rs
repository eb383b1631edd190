//! Decay-chain activities from HPGe gamma-spectroscopy reports.
//!
//! Reports are parsed into nuclide records, one representative line is
//! picked per decay chain (U-238, Th-232, K-40) and sample, and replicate
//! `a`/`b` samples are compared with a two-sided z-test.

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;

pub use config::Config;
pub use error::{Error, Result};

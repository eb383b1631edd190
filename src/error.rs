use std::path::PathBuf;

use thiserror::Error;

/// Failures at the edges of the pipeline: reading reports, loading
/// configuration, and writing result tables.
///
/// The parsing, selection and significance stages never fail; anomalies
/// there degrade to absent values in the output rows.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("reading archive {path}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("parsing config {path}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid pair suffix pattern")]
    PairPattern(#[from] regex::Error),

    #[error("unsupported output extension: .{0}")]
    UnsupportedFormat(String),

    #[error("writing CSV")]
    Csv(#[from] csv::Error),

    #[error("writing JSON")]
    Json(#[from] serde_json::Error),

    #[error("building Arrow batch")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("writing Parquet")]
    Parquet(#[from] parquet::errors::ParquetError),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

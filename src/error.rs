use std::path::PathBuf;

use thiserror::Error;

/// Failure to build an [`AccidentTable`](crate::data::model::AccidentTable)
/// from a file. There is no partial load: any of these aborts startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("malformed input: {0}")]
    Malformed(String),

    #[error("missing required columns: {0}")]
    MissingColumn(String),

    #[error("column '{column}' must be numeric, found {value:?} in row {row}")]
    NotNumeric {
        column: String,
        row: usize,
        value: String,
    },
}

/// Invalid command line / environment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("density bin count must be between 1 and 500, got {0}")]
    InvalidBins(usize),

    #[error("no data file given (pass a path or set ACCIDENTS_DATA)")]
    NoDataFile,
}

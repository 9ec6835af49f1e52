use std::path::PathBuf;

use comprel_core::QueryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    #[error(
        "The batch CSV must have at least 2 columns: 1) star name, 2) input_period, \
         plus at least one of 'ls', 't', 'snr' (found {0})"
    )]
    TooFewColumns(usize),

    #[error("Row {row}: missing value for '{column}'")]
    MissingValue { row: usize, column: String },

    #[error("Row {row}: not valid UTF-8")]
    InvalidEncoding { row: usize },

    #[error("Row {row}: invalid value '{value}' in column '{column}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error(transparent)]
    Query(#[from] QueryError),
}

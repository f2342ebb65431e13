use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("The reference table has no '{0}' column.")]
    MissingColumn(String),

    #[error("Invalid bonus amount '{value}' for '{fund}' on line {line}")]
    InvalidAmount {
        fund: String,
        value: String,
        line: u64,
    },

    #[error("No fund named '{0}' in the dataset.")]
    FundNotFound(String),

    #[error("Invalid progress bar template: {0}")]
    ProgressBarTemplate(String),
}

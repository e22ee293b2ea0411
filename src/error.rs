//! Error types for loading, cleaning and aggregating trip data.

use std::path::PathBuf;

/// Result type for the cleaning and aggregation layer.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Failures raised by the cleaning, enrichment and analytics functions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A required column is absent, usually because enrichment was not run.
    #[error("{column} not found. Did you run parse_and_enrich_datetime()?")]
    MissingColumn { column: String },

    #[error("row {row}: {column} value {value:?} does not match %m/%d/%Y %H:%M")]
    Parse {
        row: usize,
        column: String,
        value: String,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl PipelineError {
    pub fn missing_column(column: &str) -> Self {
        PipelineError::MissingColumn {
            column: column.to_string(),
        }
    }
}

/// Failures raised while reading trip or station CSV files.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("{path} is missing expected columns: {columns:?}")]
    MissingColumns { path: PathBuf, columns: Vec<String> },

    #[error("row {row}: {column} value {value:?} is not a number")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
}

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("input file {} does not exist; select a CSV file", path.display())]
    InputMissing { path: PathBuf },

    #[error("input file {} is not a valid CSV: {source}", path.display())]
    InputFormat {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to encode report rows: {0}")]
    Encode(#[from] csv::Error),

    #[error("failed to write report {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

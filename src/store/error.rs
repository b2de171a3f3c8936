use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No persisted dataset at '{0}'")]
    NotFound(PathBuf),

    #[error("Failed to create data directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("I/O error for dataset '{0}'")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to read dataset '{0}'")]
    Read(PathBuf, #[source] PolarsError),

    #[error("Failed to write dataset '{0}'")]
    Write(PathBuf, #[source] PolarsError),
}

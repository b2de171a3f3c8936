use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to create plots directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("Chart '{0}' pairs its kind with the wrong data payload")]
    SpecMismatch(&'static str),

    #[error("Chart '{0}' has no drawable data points")]
    NoData(&'static str),

    #[error("Failed to draw chart '{0}': {1}")]
    Draw(&'static str, String),

    #[error("Failed reading chart series: {0}")]
    Frame(#[from] PolarsError),
}

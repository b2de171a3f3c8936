use polars::error::PolarsError;
use polars::prelude::DataType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Observation table has no records")]
    EmptyDataset,

    #[error("Observation table is missing required column '{0}'")]
    MalformedSchema(&'static str),

    #[error("Column 'date' has type '{0}'; expected ISO-8601 strings or dates")]
    DateType(DataType),

    #[error("Failed computing derived series: {0}")]
    Frame(#[from] PolarsError),
}

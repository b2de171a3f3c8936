use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {0}")]
    Transport(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode upstream response body")]
    Decode(#[source] reqwest::Error),

    #[error("Upstream response contains no daily series")]
    DataUnavailable,

    #[error("Upstream date '{0}' is not an ISO calendar date")]
    InvalidDate(String, #[source] chrono::ParseError),

    #[error("Upstream series '{field}' has {found} values but {expected} dates")]
    MisalignedSeries {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Failed building observation table: {0}")]
    Frame(#[from] PolarsError),
}

use crate::analysis::error::AnalysisError;
use crate::open_meteo::error::FetchError;
use crate::render::error::RenderError;
use crate::store::error::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherTrendsError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

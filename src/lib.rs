mod analysis;
mod columns;
mod config;
mod error;
mod open_meteo;
mod render;
mod store;

pub use error::WeatherTrendsError;

pub use config::{Config, LatLon};

pub use open_meteo::error::FetchError;
pub use open_meteo::OpenMeteoClient;

pub use store::error::StoreError;
pub use store::ObservationStore;

pub use analysis::charts::{AnomalyGrid, ChartData, ChartKind, ChartSpec};
pub use analysis::error::AnalysisError;
pub use analysis::pipeline::{analyze, AnalysisOutput};
pub use analysis::summary::SummaryStats;

pub use render::error::RenderError;
pub use render::ChartSink;

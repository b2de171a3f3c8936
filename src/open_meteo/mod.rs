//! Open-Meteo archive client.
//!
//! Fetches the daily max/min temperature and precipitation series for a
//! coordinate and date range, and normalizes them into the canonical
//! observation table (`date`, `temperature`, `rainfall`). The daily
//! temperature is the midpoint of the day's max and min, so a single
//! representative value feeds every downstream statistic.

pub mod error;

use crate::columns::{COL_DATE, COL_RAINFALL, COL_TEMPERATURE};
use crate::config::{Config, LatLon};
use crate::open_meteo::error::FetchError;
use bon::bon;
use chrono::NaiveDate;
use log::info;
use polars::prelude::*;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const RAW_TEMP_MAX: &str = "temperature_2m_max";
const RAW_TEMP_MIN: &str = "temperature_2m_min";
const RAW_PRECIPITATION: &str = "precipitation_sum";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Archive API response, reduced to the parts this client consumes.
#[derive(Debug, Clone, Deserialize)]
struct ArchiveResponse {
    #[serde(default)]
    daily: Option<DailySeries>,
}

/// Per-date value series, aligned by index with `time`.
#[derive(Debug, Clone, Deserialize)]
struct DailySeries {
    time: Vec<String>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    precipitation_sum: Vec<Option<f64>>,
}

/// HTTP client for the Open-Meteo archive API.
pub struct OpenMeteoClient {
    http: Client,
    base_url: String,
}

#[bon]
impl OpenMeteoClient {
    /// Creates a client with the configured base URL and request timeout.
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(FetchError::ClientBuild)?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    /// Fetches daily observations for a coordinate and inclusive date range,
    /// returning the canonical observation table.
    ///
    /// The request is not retried; any transport or HTTP failure surfaces
    /// to the caller. A response without a daily block fails with
    /// [`FetchError::DataUnavailable`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use weather_trends::{Config, FetchError, LatLon, OpenMeteoClient};
    /// # use chrono::NaiveDate;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), FetchError> {
    /// let config = Config::default();
    /// let client = OpenMeteoClient::new(&config)?;
    /// let table = client
    ///     .fetch_daily()
    ///     .location(LatLon(40.1811, 44.5136))
    ///     .start_date(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
    ///     .end_date(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap())
    ///     .timezone("Asia/Yerevan")
    ///     .call()
    ///     .await?;
    /// println!("{} observations", table.height());
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn fetch_daily(
        &self,
        location: LatLon,
        start_date: NaiveDate,
        end_date: NaiveDate,
        timezone: &str,
    ) -> Result<DataFrame, FetchError> {
        let url = format!(
            "{}/archive?latitude={}&longitude={}&start_date={}&end_date={}\
             &daily={RAW_TEMP_MAX},{RAW_TEMP_MIN},{RAW_PRECIPITATION}&timezone={}",
            self.base_url,
            location.0,
            location.1,
            start_date.format(DATE_FORMAT),
            end_date.format(DATE_FORMAT),
            timezone,
        );
        info!("Downloading daily observations from {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(url.clone(), e))?;

        let response = response.error_for_status().map_err(|e| {
            if let Some(status) = e.status() {
                FetchError::HttpStatus {
                    url: url.clone(),
                    status,
                    source: e,
                }
            } else {
                FetchError::Transport(url.clone(), e)
            }
        })?;

        let payload: ArchiveResponse =
            response.json().await.map_err(FetchError::Decode)?;
        let daily = payload.daily.ok_or(FetchError::DataUnavailable)?;
        info!(
            "Received {} daily records for ({}, {})",
            daily.time.len(),
            location.0,
            location.1
        );

        normalize(daily)
    }
}

/// Turns the raw per-field series into the canonical observation table.
fn normalize(series: DailySeries) -> Result<DataFrame, FetchError> {
    let expected = series.time.len();
    for (name, len) in [
        (RAW_TEMP_MAX, series.temperature_2m_max.len()),
        (RAW_TEMP_MIN, series.temperature_2m_min.len()),
        (RAW_PRECIPITATION, series.precipitation_sum.len()),
    ] {
        if len != expected {
            return Err(FetchError::MisalignedSeries {
                field: name,
                expected,
                found: len,
            });
        }
    }

    for raw in &series.time {
        NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map_err(|e| FetchError::InvalidDate(raw.clone(), e))?;
    }

    let raw = DataFrame::new(vec![
        Column::new(COL_DATE.into(), series.time),
        Column::new(RAW_TEMP_MAX.into(), series.temperature_2m_max),
        Column::new(RAW_TEMP_MIN.into(), series.temperature_2m_min),
        Column::new(RAW_PRECIPITATION.into(), series.precipitation_sum),
    ])?;

    let canonical = raw
        .lazy()
        .with_column(
            ((col(RAW_TEMP_MAX) + col(RAW_TEMP_MIN)) / lit(2.0))
                .alias(COL_TEMPERATURE),
        )
        .rename([RAW_PRECIPITATION], [COL_RAINFALL], true)
        .select([col(COL_DATE), col(COL_TEMPERATURE), col(COL_RAINFALL)])
        .collect()?;

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_series() -> DailySeries {
        DailySeries {
            time: vec![
                "2025-01-01".to_string(),
                "2025-01-02".to_string(),
                "2025-01-03".to_string(),
            ],
            temperature_2m_max: vec![Some(4.0), Some(6.0), None],
            temperature_2m_min: vec![Some(-2.0), Some(0.0), Some(-1.0)],
            precipitation_sum: vec![Some(0.0), Some(5.5), Some(1.2)],
        }
    }

    #[test]
    fn test_normalize_computes_midpoint_temperature() {
        let df = normalize(sample_series()).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(
            df.get_column_names_str(),
            [COL_DATE, COL_TEMPERATURE, COL_RAINFALL]
        );

        let temperature = df.column(COL_TEMPERATURE).unwrap().f64().unwrap();
        assert_eq!(temperature.get(0), Some(1.0));
        assert_eq!(temperature.get(1), Some(3.0));
        // A missing extreme leaves the day's temperature missing.
        assert_eq!(temperature.get(2), None);
    }

    #[test]
    fn test_normalize_renames_precipitation_to_rainfall() {
        let df = normalize(sample_series()).unwrap();
        let rainfall = df.column(COL_RAINFALL).unwrap().f64().unwrap();
        assert_eq!(rainfall.get(1), Some(5.5));
    }

    #[test]
    fn test_normalize_rejects_misaligned_series() {
        let mut series = sample_series();
        series.precipitation_sum.pop();
        let err = normalize(series).unwrap_err();
        assert!(matches!(
            err,
            FetchError::MisalignedSeries {
                field: RAW_PRECIPITATION,
                expected: 3,
                found: 2,
            }
        ));
    }

    #[test]
    fn test_normalize_rejects_invalid_dates() {
        let mut series = sample_series();
        series.time[1] = "02/01/2025".to_string();
        let err = normalize(series).unwrap_err();
        assert!(matches!(err, FetchError::InvalidDate(raw, _) if raw == "02/01/2025"));
    }
}

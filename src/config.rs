//! Runtime configuration for the weather report run.
//!
//! The original tool kept its directories and coordinates as module-level
//! globals; here they are explicit values handed to the store, the client
//! and the chart sink.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A geographical coordinate: latitude first, longitude second, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

/// Settings for one report run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Open-Meteo archive API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// The fixed observation point.
    #[serde(default = "default_location")]
    pub location: LatLon,

    /// IANA timezone identifier sent with the archive request.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// First date of the observation range (inclusive).
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,

    /// Last date of the observation range (inclusive); `None` means today.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    /// Directory holding the persisted observation table.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory the chart artifacts are written to.
    #[serde(default = "default_plots_dir")]
    pub plots_dir: PathBuf,

    /// HTTP timeout in seconds; expiry surfaces as a transport error.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://archive-api.open-meteo.com/v1".to_string()
}

fn default_location() -> LatLon {
    // Yerevan, Armenia
    LatLon(40.1811, 44.5136)
}

fn default_timezone() -> String {
    "Asia/Yerevan".to_string()
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_plots_dir() -> PathBuf {
    PathBuf::from("plots")
}

const fn default_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            location: default_location(),
            timezone: default_timezone(),
            start_date: default_start_date(),
            end_date: None,
            data_dir: default_data_dir(),
            plots_dir: default_plots_dir(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Config {
    /// The end of the requested range, falling back to the current local date.
    pub fn resolved_end_date(&self) -> NaiveDate {
        self.end_date
            .unwrap_or_else(|| Local::now().date_naive())
    }
}

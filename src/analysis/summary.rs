//! Whole-table summary statistics.

use crate::analysis::error::AnalysisError;
use crate::columns::{COL_RAINFALL, COL_TEMPERATURE};
use polars::prelude::*;
use std::fmt;

/// Aggregates over the entire observation table.
///
/// Missing values are skipped; a table with no temperature readings at all
/// reports NaN temperatures and a zero rainfall total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStats {
    pub mean_temperature: f64,
    pub max_temperature: f64,
    pub min_temperature: f64,
    pub total_rainfall: f64,
}

impl SummaryStats {
    pub fn from_table(table: &DataFrame) -> Result<Self, AnalysisError> {
        let temperature = table.column(COL_TEMPERATURE)?.f64()?;
        let rainfall = table.column(COL_RAINFALL)?.f64()?;
        Ok(Self {
            mean_temperature: temperature.mean().unwrap_or(f64::NAN),
            max_temperature: temperature.max().unwrap_or(f64::NAN),
            min_temperature: temperature.min().unwrap_or(f64::NAN),
            total_rainfall: rainfall.sum().unwrap_or(0.0),
        })
    }
}

impl fmt::Display for SummaryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Weather Statistics:")?;
        writeln!(f, "Average Temperature: {:.2} °C", self.mean_temperature)?;
        writeln!(f, "Max Temperature: {:.2} °C", self.max_temperature)?;
        writeln!(f, "Min Temperature: {:.2} °C", self.min_temperature)?;
        write!(f, "Total Rainfall: {:.2} mm", self.total_rainfall)
    }
}

//! Chart specifications and the anomaly grid they draw from.

use crate::columns::{COL_DATE, COL_PERIOD, COL_RAINFALL, COL_TEMPERATURE, COL_TEMP_7D_AVG};
use polars::prelude::DataFrame;

pub(crate) const MONTHS_PER_YEAR: usize = 12;
pub(crate) const MAX_DAYS_PER_MONTH: usize = 31;

/// Mean temperature anomaly per (month-of-year, day-of-month) cell.
///
/// Cells without a contributing record stay empty.
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyGrid {
    cells: [[Option<f64>; MAX_DAYS_PER_MONTH]; MONTHS_PER_YEAR],
}

impl AnomalyGrid {
    pub fn new() -> Self {
        Self {
            cells: [[None; MAX_DAYS_PER_MONTH]; MONTHS_PER_YEAR],
        }
    }

    /// Stores a cell value; `month` and `day` are 1-based calendar
    /// components. Out-of-range components are ignored.
    pub fn set(&mut self, month: u32, day: u32, anomaly: f64) {
        if let Some((m, d)) = Self::cell_index(month, day) {
            self.cells[m][d] = Some(anomaly);
        }
    }

    pub fn get(&self, month: u32, day: u32) -> Option<f64> {
        Self::cell_index(month, day).and_then(|(m, d)| self.cells[m][d])
    }

    /// Largest absolute anomaly in the grid, 0.0 when every cell is empty.
    /// Anchors the diverging color scale at zero.
    pub fn max_abs(&self) -> f64 {
        self.cells
            .iter()
            .flatten()
            .flatten()
            .fold(0.0f64, |acc, v| acc.max(v.abs()))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(|cell| cell.is_none())
    }

    fn cell_index(month: u32, day: u32) -> Option<(usize, usize)> {
        if (1..=MONTHS_PER_YEAR as u32).contains(&month)
            && (1..=MAX_DAYS_PER_MONTH as u32).contains(&day)
        {
            Some(((month - 1) as usize, (day - 1) as usize))
        } else {
            None
        }
    }
}

impl Default for AnomalyGrid {
    fn default() -> Self {
        Self::new()
    }
}

/// What a chart draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
    Histogram { bins: usize },
    Heatmap,
}

/// The series or table a chart draws from.
#[derive(Debug, Clone)]
pub enum ChartData {
    Table(DataFrame),
    Grid(AnomalyGrid),
}

/// A named chart: its kind, the data it draws from, and its labels.
///
/// The destination is `<name>.svg` inside the chart sink's plots directory.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub name: &'static str,
    pub kind: ChartKind,
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub data: ChartData,
}

/// Assembles the four report charts from the derived series.
///
/// `daily` must carry `date`, `temperature` and `temp_7d_avg`; `monthly_avg`
/// must carry `period` and `rainfall`.
pub fn chart_specs(
    daily: &DataFrame,
    monthly_avg: &DataFrame,
    grid: &AnomalyGrid,
) -> Vec<ChartSpec> {
    // Column requirements documented above keep the specs honest.
    debug_assert!(daily.column(COL_DATE).is_ok());
    debug_assert!(daily.column(COL_TEMPERATURE).is_ok());
    debug_assert!(daily.column(COL_TEMP_7D_AVG).is_ok());
    debug_assert!(monthly_avg.column(COL_PERIOD).is_ok());
    debug_assert!(monthly_avg.column(COL_RAINFALL).is_ok());

    vec![
        ChartSpec {
            name: "daily_temperature",
            kind: ChartKind::Line,
            title: "Daily Temperature and 7-Day Rolling Average",
            x_label: "Date",
            y_label: "Temperature (°C)",
            data: ChartData::Table(daily.clone()),
        },
        ChartSpec {
            name: "monthly_rainfall",
            kind: ChartKind::Bar,
            title: "Monthly Average Rainfall",
            x_label: "Month",
            y_label: "Average Rainfall (mm)",
            data: ChartData::Table(monthly_avg.clone()),
        },
        ChartSpec {
            name: "temperature_distribution",
            kind: ChartKind::Histogram { bins: 20 },
            title: "Temperature Distribution",
            x_label: "Temperature (°C)",
            y_label: "Frequency",
            data: ChartData::Table(daily.clone()),
        },
        ChartSpec {
            name: "temperature_anomaly_heatmap",
            kind: ChartKind::Heatmap,
            title: "Heatmap of Temperature Anomalies by Month and Day",
            x_label: "Day of Month",
            y_label: "Month",
            data: ChartData::Grid(grid.clone()),
        },
    ]
}

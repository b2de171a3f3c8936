//! The analysis pipeline.
//!
//! A single pass of pure derivations over the canonical observation table:
//! parse and order dates, forward-fill gaps, then derive the monthly
//! averages, the trailing 7-day mean, the per-month temperature anomalies
//! and the (month, day) anomaly grid. Every step returns a new frame; the
//! input table is never modified. Running the pipeline twice on the same
//! table yields identical output.

use crate::analysis::calendar;
use crate::analysis::charts::{chart_specs, AnomalyGrid, ChartSpec};
use crate::analysis::error::AnalysisError;
use crate::analysis::summary::SummaryStats;
use crate::columns::{
    COL_DATE, COL_DAY, COL_MONTH, COL_MONTHLY_MEAN_TEMP, COL_PERIOD, COL_RAINFALL,
    COL_TEMPERATURE, COL_TEMP_7D_AVG, COL_TEMP_ANOMALY, COL_YEAR,
};
use chrono::NaiveDate;
use polars::prelude::*;

const DATE_FORMAT: &str = "%Y-%m-%d";
const ROLLING_WINDOW_DAYS: usize = 7;

/// Everything one pipeline run produces: the four chart specifications and
/// the whole-table summary statistics.
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    pub charts: Vec<ChartSpec>,
    pub stats: SummaryStats,
}

/// Runs the full pipeline over a canonical observation table.
///
/// Fails with [`AnalysisError::EmptyDataset`] on a zero-row table and with
/// [`AnalysisError::MalformedSchema`] when a required column is absent.
pub fn analyze(table: &DataFrame) -> Result<AnalysisOutput, AnalysisError> {
    let prepared = prepare(table)?;
    let monthly_avg = monthly_averages(&prepared)?;
    let daily = with_anomalies(&with_rolling_mean(&prepared)?)?;
    let grid = anomaly_grid(&daily)?;
    let stats = SummaryStats::from_table(&prepared)?;
    Ok(AnalysisOutput {
        charts: chart_specs(&daily, &monthly_avg, &grid),
        stats,
    })
}

/// Validates the table and normalizes it for derivation: parses `date`,
/// sorts ascending and forward-fills the value columns.
///
/// A missing value inherits the most recent prior value in date order;
/// leading gaps have nothing to inherit and stay missing.
pub fn prepare(table: &DataFrame) -> Result<DataFrame, AnalysisError> {
    if table.height() == 0 {
        return Err(AnalysisError::EmptyDataset);
    }
    for name in [COL_DATE, COL_TEMPERATURE, COL_RAINFALL] {
        if table.column(name).is_err() {
            return Err(AnalysisError::MalformedSchema(name));
        }
    }

    let date_expr = match table.column(COL_DATE)?.dtype() {
        DataType::Date => col(COL_DATE),
        DataType::String => col(COL_DATE).str().to_date(StrptimeOptions {
            format: Some(DATE_FORMAT.into()),
            ..Default::default()
        }),
        other => return Err(AnalysisError::DateType(other.clone())),
    };

    let prepared = table
        .clone()
        .lazy()
        .with_column(date_expr)
        .with_columns([
            col(COL_TEMPERATURE).cast(DataType::Float64),
            col(COL_RAINFALL).cast(DataType::Float64),
        ])
        .sort([COL_DATE], SortMultipleOptions::default())
        .with_columns([
            col(COL_TEMPERATURE).forward_fill(None),
            col(COL_RAINFALL).forward_fill(None),
        ])
        .collect()?;
    Ok(prepared)
}

/// Mean temperature and rainfall per calendar month period, one row per
/// (year, month) present in the table, labeled with the month-end date.
pub fn monthly_averages(table: &DataFrame) -> Result<DataFrame, AnalysisError> {
    let grouped = table
        .clone()
        .lazy()
        .group_by([
            col(COL_DATE).dt().year().alias(COL_YEAR),
            col(COL_DATE).dt().month().cast(DataType::Int32).alias(COL_MONTH),
        ])
        .agg([col(COL_TEMPERATURE).mean(), col(COL_RAINFALL).mean()])
        .sort([COL_YEAR, COL_MONTH], SortMultipleOptions::default())
        .collect()?;

    let years = grouped.column(COL_YEAR)?.i32()?;
    let months = grouped.column(COL_MONTH)?.i32()?;
    let period_ends: Vec<Option<NaiveDate>> = years
        .into_iter()
        .zip(months)
        .map(|(year, month)| calendar::month_end(year?, month? as u32))
        .collect();

    let monthly = grouped
        .hstack(&[calendar::date_column(COL_PERIOD, &period_ends)?])?
        .lazy()
        .select([col(COL_PERIOD), col(COL_TEMPERATURE), col(COL_RAINFALL)])
        .collect()?;
    Ok(monthly)
}

/// Adds `temp_7d_avg`, the trailing 7-day mean of `temperature`.
///
/// The window only emits a value once it holds seven consecutive days, so
/// the first six rows of the series stay missing.
pub fn with_rolling_mean(table: &DataFrame) -> Result<DataFrame, AnalysisError> {
    let rolled = table
        .clone()
        .lazy()
        .with_column(
            col(COL_TEMPERATURE)
                .rolling_mean(RollingOptionsFixedWindow {
                    window_size: ROLLING_WINDOW_DAYS,
                    min_periods: ROLLING_WINDOW_DAYS,
                    ..Default::default()
                })
                .alias(COL_TEMP_7D_AVG),
        )
        .collect()?;
    Ok(rolled)
}

/// Adds the calendar components and each day's deviation from the mean
/// temperature of its month-of-year. Months are pooled across years, so in
/// a multi-year range every January contributes to the January mean.
pub fn with_anomalies(table: &DataFrame) -> Result<DataFrame, AnalysisError> {
    let annotated = table
        .clone()
        .lazy()
        .with_columns([
            col(COL_DATE).dt().month().cast(DataType::Int32).alias(COL_MONTH),
            col(COL_DATE).dt().day().cast(DataType::Int32).alias(COL_DAY),
        ])
        .with_column(
            col(COL_TEMPERATURE)
                .mean()
                .over([col(COL_MONTH)])
                .alias(COL_MONTHLY_MEAN_TEMP),
        )
        .with_column(
            (col(COL_TEMPERATURE) - col(COL_MONTHLY_MEAN_TEMP)).alias(COL_TEMP_ANOMALY),
        )
        .collect()?;
    Ok(annotated)
}

/// Mean anomaly per (month-of-year, day-of-month) cell. Pairs with no
/// contributing record stay empty.
pub fn anomaly_grid(table: &DataFrame) -> Result<AnomalyGrid, AnalysisError> {
    let cells = table
        .clone()
        .lazy()
        .group_by([col(COL_MONTH), col(COL_DAY)])
        .agg([col(COL_TEMP_ANOMALY).mean()])
        .collect()?;

    let months = cells.column(COL_MONTH)?.i32()?;
    let days = cells.column(COL_DAY)?.i32()?;
    let anomalies = cells.column(COL_TEMP_ANOMALY)?.f64()?;

    let mut grid = AnomalyGrid::new();
    for ((month, day), anomaly) in months.into_iter().zip(days).zip(anomalies) {
        if let (Some(month), Some(day), Some(anomaly)) = (month, day, anomaly) {
            grid.set(month as u32, day as u32, anomaly);
        }
    }
    Ok(grid)
}

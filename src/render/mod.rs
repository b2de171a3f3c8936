//! Renders chart specifications to SVG artifacts.
//!
//! One file per spec, `<plots_dir>/<name>.svg`. The vector backend keeps
//! the sink free of system font and raster dependencies.

pub mod error;

use crate::analysis::calendar;
use crate::analysis::charts::{AnomalyGrid, ChartData, ChartKind, ChartSpec};
use crate::columns::{COL_DATE, COL_PERIOD, COL_RAINFALL, COL_TEMPERATURE, COL_TEMP_7D_AVG};
use crate::render::error::RenderError;
use chrono::{Duration, NaiveDate};
use log::info;
use plotters::prelude::*;
use polars::prelude::{DataFrame, DateChunked, Float64Chunked};
use std::ops::Range;
use std::path::{Path, PathBuf};

const LINE_SIZE: (u32, u32) = (1200, 600);
const BAR_SIZE: (u32, u32) = (1000, 500);
const HISTOGRAM_SIZE: (u32, u32) = (800, 500);
const HEATMAP_SIZE: (u32, u32) = (1500, 600);

const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const CORAL: RGBColor = RGBColor(255, 127, 80);
// Diverging scale endpoints: blue for cold anomalies, red for warm ones.
const COOL_END: RGBColor = RGBColor(59, 76, 192);
const WARM_END: RGBColor = RGBColor(180, 4, 38);

const CAPTION_FONT: (&str, u32) = ("sans-serif", 24);

/// Writes chart artifacts into a plots directory, one SVG per spec.
pub struct ChartSink {
    plots_dir: PathBuf,
}

impl ChartSink {
    pub fn new(plots_dir: impl Into<PathBuf>) -> Self {
        Self {
            plots_dir: plots_dir.into(),
        }
    }

    /// Renders a chart spec to `<plots_dir>/<name>.svg` and returns the
    /// path of the written artifact.
    pub fn render(&self, spec: &ChartSpec) -> Result<PathBuf, RenderError> {
        std::fs::create_dir_all(&self.plots_dir)
            .map_err(|e| RenderError::DirCreation(self.plots_dir.clone(), e))?;
        let path = self.plots_dir.join(format!("{}.svg", spec.name));

        match (spec.kind, &spec.data) {
            (ChartKind::Line, ChartData::Table(table)) => draw_line(spec, table, &path)?,
            (ChartKind::Bar, ChartData::Table(table)) => draw_bar(spec, table, &path)?,
            (ChartKind::Histogram { bins }, ChartData::Table(table)) => {
                draw_histogram(spec, table, bins, &path)?
            }
            (ChartKind::Heatmap, ChartData::Grid(grid)) => draw_heatmap(spec, grid, &path)?,
            _ => return Err(RenderError::SpecMismatch(spec.name)),
        }

        info!("Rendered chart '{}' to {:?}", spec.name, path);
        Ok(path)
    }
}

fn draw_failure(name: &'static str, e: impl std::fmt::Display) -> RenderError {
    RenderError::Draw(name, e.to_string())
}

/// Pairs each date with its value, skipping rows where either is missing.
fn series_points(dates: &DateChunked, values: &Float64Chunked) -> Vec<(NaiveDate, f64)> {
    dates
        .into_iter()
        .zip(values)
        .filter_map(|(date, value)| Some((calendar::from_epoch_days(date?), value?)))
        .collect()
}

fn line_ranges(
    primary: &[(NaiveDate, f64)],
    secondary: &[(NaiveDate, f64)],
) -> (Range<NaiveDate>, Range<f64>) {
    let mut x_min = primary[0].0;
    let mut x_max = primary[0].0;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for (date, value) in primary.iter().chain(secondary) {
        x_min = x_min.min(*date);
        x_max = x_max.max(*date);
        y_min = y_min.min(*value);
        y_max = y_max.max(*value);
    }
    if x_min == x_max {
        x_max = x_max + Duration::days(1);
    }
    let pad = ((y_max - y_min) * 0.05).max(0.5);
    (x_min..x_max, (y_min - pad)..(y_max + pad))
}

fn draw_line(spec: &ChartSpec, table: &DataFrame, path: &Path) -> Result<(), RenderError> {
    let dates = table.column(COL_DATE)?.date()?;
    let temperature = table.column(COL_TEMPERATURE)?.f64()?;
    let rolling = table.column(COL_TEMP_7D_AVG)?.f64()?;

    let temp_points = series_points(dates, temperature);
    let rolling_points = series_points(dates, rolling);
    if temp_points.is_empty() {
        return Err(RenderError::NoData(spec.name));
    }
    let (x_range, y_range) = line_ranges(&temp_points, &rolling_points);

    let root = SVGBackend::new(path, LINE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| draw_failure(spec.name, e))?;
    let mut chart = ChartBuilder::on(&root)
        .caption(spec.title, CAPTION_FONT)
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range, y_range)
        .map_err(|e| draw_failure(spec.name, e))?;
    chart
        .configure_mesh()
        .x_desc(spec.x_label)
        .y_desc(spec.y_label)
        .draw()
        .map_err(|e| draw_failure(spec.name, e))?;

    chart
        .draw_series(LineSeries::new(temp_points, &BLUE))
        .map_err(|e| draw_failure(spec.name, e))?
        .label("Daily Temp")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
    chart
        .draw_series(LineSeries::new(rolling_points, RED.stroke_width(3)))
        .map_err(|e| draw_failure(spec.name, e))?
        .label("7-Day Rolling Avg")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(3)));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| draw_failure(spec.name, e))?;
    root.present().map_err(|e| draw_failure(spec.name, e))?;
    Ok(())
}

fn draw_bar(spec: &ChartSpec, table: &DataFrame, path: &Path) -> Result<(), RenderError> {
    let periods = table.column(COL_PERIOD)?.date()?;
    let rainfall = table.column(COL_RAINFALL)?.f64()?;

    let bars: Vec<(String, f64)> = periods
        .into_iter()
        .zip(rainfall)
        .filter_map(|(period, value)| {
            let label = calendar::from_epoch_days(period?).format("%Y-%m").to_string();
            Some((label, value?))
        })
        .collect();
    if bars.is_empty() {
        return Err(RenderError::NoData(spec.name));
    }

    let y_max = bars.iter().fold(0.0f64, |acc, (_, v)| acc.max(*v));
    let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };
    let labels: Vec<String> = bars.iter().map(|(label, _)| label.clone()).collect();

    let root = SVGBackend::new(path, BAR_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| draw_failure(spec.name, e))?;
    let mut chart = ChartBuilder::on(&root)
        .caption(spec.title, CAPTION_FONT)
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((0..bars.len()).into_segmented(), 0f64..y_max)
        .map_err(|e| draw_failure(spec.name, e))?;
    chart
        .configure_mesh()
        .x_desc(spec.x_label)
        .y_desc(spec.y_label)
        .x_label_formatter(&|coord| match coord {
            SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => {
                labels.get(*i).cloned().unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        })
        .draw()
        .map_err(|e| draw_failure(spec.name, e))?;

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(SKY_BLUE.filled())
                .margin(2)
                .data(bars.iter().enumerate().map(|(i, (_, value))| (i, *value))),
        )
        .map_err(|e| draw_failure(spec.name, e))?;
    root.present().map_err(|e| draw_failure(spec.name, e))?;
    Ok(())
}

fn draw_histogram(
    spec: &ChartSpec,
    table: &DataFrame,
    bins: usize,
    path: &Path,
) -> Result<(), RenderError> {
    let temperature = table.column(COL_TEMPERATURE)?.f64()?;
    let values: Vec<f64> = temperature.into_iter().flatten().collect();
    if values.is_empty() || bins == 0 {
        return Err(RenderError::NoData(spec.name));
    }

    let lo = values.iter().fold(f64::INFINITY, |acc, v| acc.min(*v));
    let hi = values.iter().fold(f64::NEG_INFINITY, |acc, v| acc.max(*v));
    let span = if hi > lo { hi - lo } else { 1.0 };
    let width = span / bins as f64;

    let mut counts = vec![0u32; bins];
    for value in &values {
        let offset = ((value - lo) / width) as usize;
        counts[offset.min(bins - 1)] += 1;
    }
    let y_max = counts.iter().copied().max().unwrap_or(0) + 1;

    let root = SVGBackend::new(path, HISTOGRAM_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| draw_failure(spec.name, e))?;
    let mut chart = ChartBuilder::on(&root)
        .caption(spec.title, CAPTION_FONT)
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(lo..(lo + span), 0u32..y_max)
        .map_err(|e| draw_failure(spec.name, e))?;
    chart
        .configure_mesh()
        .x_desc(spec.x_label)
        .y_desc(spec.y_label)
        .draw()
        .map_err(|e| draw_failure(spec.name, e))?;

    let bin_bar = |i: usize, count: u32| {
        let x0 = lo + i as f64 * width;
        [(x0, 0u32), (x0 + width, count)]
    };
    chart
        .draw_series(
            counts
                .iter()
                .enumerate()
                .map(|(i, &count)| Rectangle::new(bin_bar(i, count), CORAL.filled())),
        )
        .map_err(|e| draw_failure(spec.name, e))?;
    chart
        .draw_series(
            counts
                .iter()
                .enumerate()
                .map(|(i, &count)| Rectangle::new(bin_bar(i, count), BLACK.stroke_width(1))),
        )
        .map_err(|e| draw_failure(spec.name, e))?;
    root.present().map_err(|e| draw_failure(spec.name, e))?;
    Ok(())
}

fn draw_heatmap(spec: &ChartSpec, grid: &AnomalyGrid, path: &Path) -> Result<(), RenderError> {
    if grid.is_empty() {
        return Err(RenderError::NoData(spec.name));
    }
    let scale = grid.max_abs();

    let root = SVGBackend::new(path, HEATMAP_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| draw_failure(spec.name, e))?;
    let mut chart = ChartBuilder::on(&root)
        .caption(spec.title, CAPTION_FONT)
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(1i32..32i32, 1i32..13i32)
        .map_err(|e| draw_failure(spec.name, e))?;
    chart
        .configure_mesh()
        .x_desc(spec.x_label)
        .y_desc(spec.y_label)
        .disable_mesh()
        .draw()
        .map_err(|e| draw_failure(spec.name, e))?;

    chart
        .draw_series(
            (1u32..=12)
                .flat_map(|month| (1u32..=31).map(move |day| (month, day)))
                .filter_map(|(month, day)| {
                    grid.get(month, day).map(|anomaly| {
                        Rectangle::new(
                            [
                                (day as i32, month as i32),
                                (day as i32 + 1, month as i32 + 1),
                            ],
                            diverging_color(anomaly, scale).filled(),
                        )
                    })
                }),
        )
        .map_err(|e| draw_failure(spec.name, e))?;
    root.present().map_err(|e| draw_failure(spec.name, e))?;
    Ok(())
}

/// Diverging color centered at zero: white fades to red for warm anomalies
/// and to blue for cold ones.
fn diverging_color(anomaly: f64, scale: f64) -> RGBColor {
    if scale <= 0.0 {
        return WHITE;
    }
    let strength = (anomaly.abs() / scale).clamp(0.0, 1.0);
    let end = if anomaly < 0.0 { COOL_END } else { WARM_END };
    let channel =
        |to: u8| (255.0 + (to as f64 - 255.0) * strength).round() as u8;
    RGBColor(channel(end.0), channel(end.1), channel(end.2))
}

//! Column names shared across the crate.
//!
//! The canonical observation table carries `date`, `temperature` and
//! `rainfall`; everything else is derived by the analysis pipeline.

// Canonical observation table
pub(crate) const COL_DATE: &str = "date";
pub(crate) const COL_TEMPERATURE: &str = "temperature";
pub(crate) const COL_RAINFALL: &str = "rainfall";

// Derived series
pub(crate) const COL_TEMP_7D_AVG: &str = "temp_7d_avg";
pub(crate) const COL_YEAR: &str = "year";
pub(crate) const COL_MONTH: &str = "month";
pub(crate) const COL_DAY: &str = "day";
pub(crate) const COL_MONTHLY_MEAN_TEMP: &str = "monthly_mean_temp";
pub(crate) const COL_TEMP_ANOMALY: &str = "temp_anomaly";

// Monthly aggregate table
pub(crate) const COL_PERIOD: &str = "period";

//! Outlier detection over activity-count series

use crate::data::{TimeSeries, TimeSeriesPoint};
use crate::error::{ForecastError, Result};
use crate::utils::quantile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::fmt;
use std::str::FromStr;

/// Method used to flag outlying observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMethod {
    /// Distance from the mean in population standard deviations
    Statistical,
    /// Distance outside the interquartile range
    Iqr,
}

/// Observations flagged as outliers, in original timestamp order.
///
/// Derived fresh from a series on each [`detect`] call and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutlierSet {
    points: Vec<TimeSeriesPoint>,
}

impl OutlierSet {
    /// Build a set from explicitly chosen observations.
    pub fn from_points(points: Vec<TimeSeriesPoint>) -> Self {
        Self { points }
    }

    /// The flagged observations.
    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    /// Number of flagged observations.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check whether no observations were flagged.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Timestamps of the flagged observations.
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    /// Check whether the observation at `timestamp` was flagged.
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.points.iter().any(|p| p.timestamp == timestamp)
    }
}

/// Flag outlying observations in `series`.
///
/// For [`DetectionMethod::Statistical`], a point is an outlier when it lies
/// more than `threshold` population standard deviations from the mean; a
/// zero-variance series flags nothing. For [`DetectionMethod::Iqr`], the
/// accepted band is `[Q1 - threshold * IQR, Q3 + threshold * IQR]` with
/// linear-interpolated quartiles.
pub fn detect(series: &TimeSeries, method: DetectionMethod, threshold: f64) -> Result<OutlierSet> {
    if series.is_empty() {
        return Err(ForecastError::InvalidInput(
            "Cannot detect outliers in an empty series".to_string(),
        ));
    }
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(ForecastError::InvalidInput(format!(
            "Detection threshold must be non-negative, got {}",
            threshold
        )));
    }

    let values = series.values();

    let (lower_bound, upper_bound) = match method {
        DetectionMethod::Statistical => {
            let mean = values.iter().mean();
            let std_dev = values.iter().population_std_dev();
            (mean - threshold * std_dev, mean + threshold * std_dev)
        }
        DetectionMethod::Iqr => {
            let q1 = quantile(&values, 0.25)?;
            let q3 = quantile(&values, 0.75)?;
            let iqr = q3 - q1;
            (q1 - threshold * iqr, q3 + threshold * iqr)
        }
    };

    let points = series
        .points()
        .iter()
        .filter(|p| p.value < lower_bound || p.value > upper_bound)
        .copied()
        .collect();

    Ok(OutlierSet { points })
}

impl FromStr for DetectionMethod {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "statistical" => Ok(DetectionMethod::Statistical),
            "iqr" => Ok(DetectionMethod::Iqr),
            other => Err(ForecastError::UnsupportedMethod(other.to_string())),
        }
    }
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionMethod::Statistical => f.write_str("statistical"),
            DetectionMethod::Iqr => f.write_str("iqr"),
        }
    }
}

//! Gap-filling and interpolation of irregular or outlier-stripped series

use crate::data::{TimeSeries, TimeSeriesPoint};
use crate::error::{ForecastError, Result};
use crate::frequency::Frequency;
use crate::outliers::OutlierSet;
use crate::utils::{polyfit, polyval};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Strategy used to fill cleared and naturally missing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillStrategy {
    /// Straight-line interpolation between anchors, weighted by position
    Linear,
    /// Straight-line interpolation weighted by elapsed time
    Time,
    /// Single global least-squares polynomial fit over all known points
    Polynomial,
    /// Carry the most recent known value forward
    Ffill,
    /// Take the nearest following known value
    Bfill,
}

/// Side-channel counts from a reconstruction, for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconstructionReport {
    /// Observations cleared because they were flagged as outliers
    pub outliers_cleared: usize,
    /// Grid ticks inserted because no observation existed there
    pub missing_ticks_inserted: usize,
    /// Points the strategy could not fill (no usable anchor)
    pub unfilled: usize,
}

/// A reconstructed series together with its report.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction {
    pub series: TimeSeries,
    pub report: ReconstructionReport,
}

/// Rebuild `series` as a regular, gap-filled series.
///
/// Flagged outliers are cleared to missing in a working copy (the input is
/// never mutated), the full timestamp grid at `frequency` is completed, and
/// missing values are filled per `strategy`. Observed off-grid timestamps
/// are retained alongside the grid. Duplicate input timestamps collapse to
/// the last observed value.
///
/// `degree` is required for [`FillStrategy::Polynomial`] and must lie in
/// 1..=10. Points no strategy can fill (a leading gap under `ffill`, a
/// trailing gap under `bfill`, an anchor-free series) are dropped from the
/// output and counted in the report's `unfilled`; callers must treat a
/// non-zero count as a reportable condition, not a silent success.
pub fn reconstruct(
    series: &TimeSeries,
    outliers: &OutlierSet,
    frequency: Frequency,
    strategy: FillStrategy,
    degree: Option<u32>,
) -> Result<Reconstruction> {
    let polynomial_degree = match (strategy, degree) {
        (FillStrategy::Polynomial, None) => {
            return Err(ForecastError::InvalidInput(
                "Polynomial interpolation requires a degree".to_string(),
            ));
        }
        (FillStrategy::Polynomial, Some(d)) if !(1..=10).contains(&d) => {
            return Err(ForecastError::InvalidInput(format!(
                "Polynomial degree must be between 1 and 10, got {}",
                d
            )));
        }
        (FillStrategy::Polynomial, Some(d)) => Some(d as usize),
        _ => None,
    };

    let (start, end) = match (series.start(), series.end()) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            return Err(ForecastError::InvalidInput(
                "Cannot reconstruct an empty series".to_string(),
            ));
        }
    };

    // Working copy: observed values keyed by timestamp, missing as None
    let mut working: BTreeMap<DateTime<Utc>, Option<f64>> = BTreeMap::new();
    for point in series.points() {
        working.insert(point.timestamp, Some(point.value));
    }

    let mut outliers_cleared = 0;
    for point in outliers.points() {
        if let Some(slot) = working.get_mut(&point.timestamp) {
            if slot.is_some() {
                *slot = None;
                outliers_cleared += 1;
            }
        }
    }

    let mut missing_ticks_inserted = 0;
    for tick in frequency.grid(start, end)? {
        if !working.contains_key(&tick) {
            working.insert(tick, None);
            missing_ticks_inserted += 1;
        }
    }

    let mut slots: Vec<(DateTime<Utc>, Option<f64>)> = working.into_iter().collect();

    match strategy {
        FillStrategy::Linear => fill_between_anchors(&mut slots, false),
        FillStrategy::Time => fill_between_anchors(&mut slots, true),
        FillStrategy::Polynomial => {
            // polynomial_degree is Some by the validation above
            fill_polynomial(&mut slots, polynomial_degree.unwrap_or(1))?
        }
        FillStrategy::Ffill => fill_forward(&mut slots),
        FillStrategy::Bfill => fill_backward(&mut slots),
    }

    let unfilled = slots.iter().filter(|(_, value)| value.is_none()).count();
    if unfilled > 0 {
        warn!(unfilled, %strategy, "reconstruction left points unfilled");
    }

    let points = slots
        .into_iter()
        .filter_map(|(timestamp, value)| value.map(|value| TimeSeriesPoint { timestamp, value }))
        .collect();

    Ok(Reconstruction {
        series: TimeSeries::from_points(points),
        report: ReconstructionReport {
            outliers_cleared,
            missing_ticks_inserted,
            unfilled,
        },
    })
}

/// Interpolate every gap that sits between two known values. Weights are by
/// position, or by elapsed time when `time_weighted` is set (needed when the
/// working set is irregular). Leading and trailing gaps have no anchor pair
/// and stay missing.
fn fill_between_anchors(slots: &mut [(DateTime<Utc>, Option<f64>)], time_weighted: bool) {
    let known: Vec<usize> = slots
        .iter()
        .enumerate()
        .filter_map(|(idx, (_, value))| value.map(|_| idx))
        .collect();

    for pair in known.windows(2) {
        let (left, right) = (pair[0], pair[1]);
        if right - left < 2 {
            continue;
        }

        let (left_ts, left_value) = (slots[left].0, slots[left].1.unwrap_or_default());
        let (right_ts, right_value) = (slots[right].0, slots[right].1.unwrap_or_default());

        for idx in left + 1..right {
            let weight = if time_weighted {
                let span = (right_ts - left_ts).num_milliseconds() as f64;
                let elapsed = (slots[idx].0 - left_ts).num_milliseconds() as f64;
                elapsed / span
            } else {
                (idx - left) as f64 / (right - left) as f64
            };

            slots[idx].1 = Some(left_value + (right_value - left_value) * weight);
        }
    }
}

/// Fit one polynomial over all known (position, value) pairs and evaluate it
/// at every missing position. This is a single global fit across the whole
/// series, not a piecewise spline.
fn fill_polynomial(slots: &mut [(DateTime<Utc>, Option<f64>)], degree: usize) -> Result<()> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = slots
        .iter()
        .enumerate()
        .filter_map(|(idx, (_, value))| value.map(|v| (idx as f64, v)))
        .unzip();

    if xs.len() <= degree {
        return Err(ForecastError::InvalidInput(format!(
            "Polynomial fill of degree {} needs at least {} known points, got {}",
            degree,
            degree + 1,
            xs.len()
        )));
    }

    let coefficients = polyfit(&xs, &ys, degree)?;

    for (idx, slot) in slots.iter_mut().enumerate() {
        if slot.1.is_none() {
            slot.1 = Some(polyval(&coefficients, idx as f64));
        }
    }

    Ok(())
}

fn fill_forward(slots: &mut [(DateTime<Utc>, Option<f64>)]) {
    let mut last_known = None;
    for (_, value) in slots.iter_mut() {
        match value {
            Some(v) => last_known = Some(*v),
            None => *value = last_known,
        }
    }
}

fn fill_backward(slots: &mut [(DateTime<Utc>, Option<f64>)]) {
    let mut next_known = None;
    for (_, value) in slots.iter_mut().rev() {
        match value {
            Some(v) => next_known = Some(*v),
            None => *value = next_known,
        }
    }
}

impl FromStr for FillStrategy {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "linear" => Ok(FillStrategy::Linear),
            "time" => Ok(FillStrategy::Time),
            "polynomial" => Ok(FillStrategy::Polynomial),
            "ffill" => Ok(FillStrategy::Ffill),
            "bfill" => Ok(FillStrategy::Bfill),
            other => Err(ForecastError::UnsupportedStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for FillStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FillStrategy::Linear => "linear",
            FillStrategy::Time => "time",
            FillStrategy::Polynomial => "polynomial",
            FillStrategy::Ffill => "ffill",
            FillStrategy::Bfill => "bfill",
        };
        f.write_str(name)
    }
}

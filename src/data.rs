//! Time series data handling for demand forecasting

use crate::error::{ForecastError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::fs::File;
use std::path::Path;

/// A single observation: a timestamp and an activity count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// An activity-count series, kept sorted by timestamp.
///
/// Input timestamps need not be unique or regularly spaced; gap-filling
/// produces a grid-complete series (see [`crate::interpolate::reconstruct`]).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeSeries {
    points: Vec<TimeSeriesPoint>,
}

/// Data loader for activity-count series
#[derive(Debug)]
pub struct DataLoader;

impl TimeSeries {
    /// Create a series from parallel timestamp and value vectors.
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(ForecastError::InvalidInput(format!(
                "Timestamps length ({}) doesn't match values length ({})",
                timestamps.len(),
                values.len()
            )));
        }

        let points = timestamps
            .into_iter()
            .zip(values)
            .map(|(timestamp, value)| TimeSeriesPoint { timestamp, value })
            .collect();

        Ok(Self::from_points(points))
    }

    /// Create a series from observation points, sorting them by timestamp.
    pub fn from_points(mut points: Vec<TimeSeriesPoint>) -> Self {
        points.sort_by_key(|p| p.timestamp);
        Self { points }
    }

    /// The observations, in timestamp order.
    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The timestamps, in order.
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    /// The observed values, in timestamp order.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// The earliest timestamp, if any.
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.points.first().map(|p| p.timestamp)
    }

    /// The latest timestamp, if any.
    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.points.last().map(|p| p.timestamp)
    }

    /// Look up the value observed at an exact timestamp.
    pub fn value_at(&self, timestamp: DateTime<Utc>) -> Option<f64> {
        self.points
            .binary_search_by_key(&timestamp, |p| p.timestamp)
            .ok()
            .map(|idx| self.points[idx].value)
    }

    /// Mean of the observed values.
    pub fn mean(&self) -> Result<f64> {
        if self.is_empty() {
            return Err(ForecastError::InvalidInput(
                "Empty time series data".to_string(),
            ));
        }

        Ok(self.points.iter().map(|p| &p.value).mean())
    }

    /// Population standard deviation of the observed values.
    pub fn population_std_dev(&self) -> Result<f64> {
        if self.is_empty() {
            return Err(ForecastError::InvalidInput(
                "Empty time series data".to_string(),
            ));
        }

        Ok(self.points.iter().map(|p| &p.value).population_std_dev())
    }
}

impl DataLoader {
    /// Load a series from a CSV file, detecting the timestamp and value
    /// columns from the header row.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<TimeSeries> {
        let file = File::open(path)?;
        let mut reader = csv::Reader::from_reader(file);

        let headers = reader.headers()?.clone();
        let timestamp_idx = Self::detect_timestamp_column(&headers)?;
        let value_idx = Self::detect_value_column(&headers, timestamp_idx)?;

        Self::read_records(&mut reader, timestamp_idx, value_idx)
    }

    /// Load a series from a CSV file with explicit column names.
    pub fn from_csv_with_columns<P: AsRef<Path>>(
        path: P,
        timestamp_column: &str,
        value_column: &str,
    ) -> Result<TimeSeries> {
        let file = File::open(path)?;
        let mut reader = csv::Reader::from_reader(file);

        let headers = reader.headers()?.clone();
        let timestamp_idx = Self::column_index(&headers, timestamp_column)?;
        let value_idx = Self::column_index(&headers, value_column)?;

        Self::read_records(&mut reader, timestamp_idx, value_idx)
    }

    fn read_records(
        reader: &mut csv::Reader<File>,
        timestamp_idx: usize,
        value_idx: usize,
    ) -> Result<TimeSeries> {
        let mut points = Vec::new();

        for (row, record) in reader.records().enumerate() {
            let record = record?;

            let raw_timestamp = record.get(timestamp_idx).ok_or_else(|| {
                ForecastError::InvalidInput(format!("Row {}: missing timestamp field", row + 1))
            })?;
            let raw_value = record.get(value_idx).ok_or_else(|| {
                ForecastError::InvalidInput(format!("Row {}: missing value field", row + 1))
            })?;

            let timestamp = parse_timestamp(raw_timestamp)?;
            let value: f64 = raw_value.trim().parse().map_err(|_| {
                ForecastError::InvalidInput(format!(
                    "Row {}: cannot parse value '{}' as a number",
                    row + 1,
                    raw_value
                ))
            })?;

            points.push(TimeSeriesPoint { timestamp, value });
        }

        Ok(TimeSeries::from_points(points))
    }

    /// Detect the timestamp column in a CSV header
    fn detect_timestamp_column(headers: &csv::StringRecord) -> Result<usize> {
        for (idx, name) in headers.iter().enumerate() {
            let lower_name = name.to_lowercase();
            if lower_name == "ds"
                || lower_name.contains("date")
                || lower_name.contains("time")
                || lower_name.contains("timestamp")
            {
                return Ok(idx);
            }
        }

        Err(ForecastError::InvalidInput(
            "No timestamp column found in data".to_string(),
        ))
    }

    /// Detect the activity-count column in a CSV header
    fn detect_value_column(headers: &csv::StringRecord, timestamp_idx: usize) -> Result<usize> {
        for (idx, name) in headers.iter().enumerate() {
            let lower_name = name.to_lowercase();
            if lower_name == "y"
                || lower_name.contains("count")
                || lower_name.contains("value")
                || lower_name.contains("activity")
            {
                return Ok(idx);
            }
        }

        // Fall back to the first column that isn't the timestamp
        for idx in 0..headers.len() {
            if idx != timestamp_idx {
                return Ok(idx);
            }
        }

        Err(ForecastError::InvalidInput(
            "No value column found in data".to_string(),
        ))
    }

    fn column_index(headers: &csv::StringRecord, column: &str) -> Result<usize> {
        headers
            .iter()
            .position(|name| name == column)
            .ok_or_else(|| {
                ForecastError::InvalidInput(format!("Column '{}' not found in data", column))
            })
    }
}

/// Parse a timestamp from common date and datetime formats.
///
/// Accepts ISO datetimes (`2023-01-15T14:30:45`, with or without the `T`),
/// ISO dates, and `MM/DD/YYYY` dates. Dates are taken as midnight UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    let trimmed = s.trim();

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
        }
    }

    for format in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            let naive = NaiveDateTime::new(date, chrono::NaiveTime::default());
            return Ok(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
        }
    }

    Err(ForecastError::InvalidInput(format!(
        "Cannot parse timestamp '{}'",
        trimmed
    )))
}

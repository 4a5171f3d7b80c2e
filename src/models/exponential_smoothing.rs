//! Simple exponential smoothing baseline

use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::frequency::Frequency;
use crate::models::{z_score, ForecastModel, ForecastRow, TrainedForecastModel};
use chrono::{DateTime, Utc};
use statrs::statistics::Statistics;

/// Simple exponential smoothing model
#[derive(Debug, Clone)]
pub struct ExponentialSmoothing {
    /// Name of the model
    name: String,
    /// Smoothing parameter
    alpha: f64,
}

/// Trained exponential smoothing model
#[derive(Debug, Clone)]
pub struct TrainedExponentialSmoothing {
    /// Name of the model
    name: String,
    /// Final smoothed level
    level: f64,
    /// One-step-ahead fitted values over the training period
    fitted: Vec<(DateTime<Utc>, f64)>,
    /// Population standard deviation of the fit residuals
    residual_std: f64,
    /// Last training timestamp
    last_timestamp: DateTime<Utc>,
}

impl ExponentialSmoothing {
    /// Create a new exponential smoothing model
    pub fn new(alpha: f64) -> Result<Self> {
        if alpha <= 0.0 || alpha >= 1.0 {
            return Err(ForecastError::InvalidInput(
                "Alpha must be between 0 and 1".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Exponential Smoothing (alpha={})", alpha),
            alpha,
        })
    }
}

impl ForecastModel for ExponentialSmoothing {
    type Trained = TrainedExponentialSmoothing;

    fn train(&self, series: &TimeSeries) -> Result<Self::Trained> {
        let values = series.values();
        let timestamps = series.timestamps();
        if values.is_empty() {
            return Err(ForecastError::InvalidInput(
                "Empty time series data".to_string(),
            ));
        }

        // One-step-ahead fitted values: the level before seeing each point
        let mut level = values[0];
        let mut fitted = Vec::with_capacity(values.len());
        fitted.push((timestamps[0], values[0]));

        for i in 1..values.len() {
            fitted.push((timestamps[i], level));
            level = self.alpha * values[i] + (1.0 - self.alpha) * level;
        }

        let residuals: Vec<f64> = fitted
            .iter()
            .zip(&values)
            .map(|((_, prediction), actual)| actual - prediction)
            .collect();
        let residual_std = residuals.iter().population_std_dev();

        Ok(TrainedExponentialSmoothing {
            name: self.name.clone(),
            level,
            fitted,
            residual_std,
            last_timestamp: timestamps[values.len() - 1],
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedForecastModel for TrainedExponentialSmoothing {
    fn forecast(
        &self,
        horizon: usize,
        confidence_level: f64,
        frequency: Frequency,
    ) -> Result<Vec<ForecastRow>> {
        let margin = z_score(confidence_level)? * self.residual_std;

        let mut rows: Vec<ForecastRow> = self
            .fitted
            .iter()
            .map(|&(timestamp, yhat)| ForecastRow {
                timestamp,
                yhat,
                yhat_lower: yhat - margin,
                yhat_upper: yhat + margin,
            })
            .collect();

        // The forecast is constant at the last level
        for timestamp in frequency.future_timestamps(self.last_timestamp, horizon)? {
            rows.push(ForecastRow {
                timestamp,
                yhat: self.level,
                yhat_lower: self.level - margin,
                yhat_upper: self.level + margin,
            });
        }

        Ok(rows)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

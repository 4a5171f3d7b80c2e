//! Simple moving average baseline

use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::frequency::Frequency;
use crate::models::{z_score, ForecastModel, ForecastRow, TrainedForecastModel};
use chrono::{DateTime, Utc};
use statrs::statistics::Statistics;

/// Simple Moving Average model
#[derive(Debug, Clone)]
pub struct SimpleMovingAverage {
    /// Name of the model
    name: String,
    /// Window size
    window: usize,
}

/// Trained Simple Moving Average model
#[derive(Debug, Clone)]
pub struct TrainedSimpleMovingAverage {
    /// Name of the model
    name: String,
    /// Average of the last window
    last_average: f64,
    /// Fitted values over the training period
    fitted: Vec<(DateTime<Utc>, f64)>,
    /// Population standard deviation of the fit residuals
    residual_std: f64,
    /// Last training timestamp
    last_timestamp: DateTime<Utc>,
}

impl SimpleMovingAverage {
    /// Create a new Simple Moving Average model
    pub fn new(window: usize) -> Result<Self> {
        if window == 0 {
            return Err(ForecastError::InvalidInput(
                "Window size must be positive".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Simple Moving Average (window={})", window),
            window,
        })
    }
}

impl ForecastModel for SimpleMovingAverage {
    type Trained = TrainedSimpleMovingAverage;

    fn train(&self, series: &TimeSeries) -> Result<Self::Trained> {
        let values = series.values();
        let timestamps = series.timestamps();
        if values.len() < self.window {
            return Err(ForecastError::InvalidInput(format!(
                "Insufficient data for SMA. Need at least {} observations.",
                self.window
            )));
        }

        // Before a full window exists the fitted value is the observation
        let mut fitted = Vec::with_capacity(values.len());
        for i in 0..values.len() {
            let prediction = if i < self.window {
                values[i]
            } else {
                values[i - self.window..i].iter().sum::<f64>() / self.window as f64
            };
            fitted.push((timestamps[i], prediction));
        }

        let residuals: Vec<f64> = fitted
            .iter()
            .zip(&values)
            .skip(self.window)
            .map(|((_, prediction), actual)| actual - prediction)
            .collect();
        let residual_std = if residuals.is_empty() {
            0.0
        } else {
            residuals.iter().population_std_dev()
        };

        let last_average =
            values[values.len() - self.window..].iter().sum::<f64>() / self.window as f64;

        Ok(TrainedSimpleMovingAverage {
            name: self.name.clone(),
            last_average,
            fitted,
            residual_std,
            last_timestamp: timestamps[values.len() - 1],
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedForecastModel for TrainedSimpleMovingAverage {
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

        // For a simple MA, the forecast is constant at the last average
        for timestamp in frequency.future_timestamps(self.last_timestamp, horizon)? {
            rows.push(ForecastRow {
                timestamp,
                yhat: self.last_average,
                yhat_lower: self.last_average - margin,
                yhat_upper: self.last_average + margin,
            });
        }

        Ok(rows)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

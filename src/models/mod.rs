//! Forecasting models for activity-count series
//!
//! The statistical model is a seam: anything implementing [`ForecastModel`]
//! can sit behind the pipeline. The built-in implementations are simple
//! baselines; production deployments can wrap an external model instead.

use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::frequency::Frequency;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// One forecast step: a point estimate with its confidence bounds.
///
/// Rows cover the historical fit period followed by the future horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub timestamp: DateTime<Utc>,
    /// Point estimate of demand at this step
    pub yhat: f64,
    /// Lower confidence bound
    pub yhat_lower: f64,
    /// Upper confidence bound
    pub yhat_upper: f64,
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Produce rows for the historical fit period plus `horizon` future
    /// ticks at `frequency`, with bounds at `confidence_level` in (0, 1).
    fn forecast(
        &self,
        horizon: usize,
        confidence_level: f64,
        frequency: Frequency,
    ) -> Result<Vec<ForecastRow>>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a gap-free series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on time series data
    fn train(&self, series: &TimeSeries) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

/// Standard-normal multiplier for a two-sided confidence level.
pub(crate) fn z_score(confidence_level: f64) -> Result<f64> {
    if confidence_level <= 0.0 || confidence_level >= 1.0 {
        return Err(ForecastError::InvalidInput(
            "Confidence level must be between 0 and 1".to_string(),
        ));
    }

    let z = match confidence_level {
        c if c >= 0.99 => 2.576,
        c if c >= 0.95 => 1.96,
        c if c >= 0.90 => 1.645,
        _ => 1.0,
    };

    Ok(z)
}

pub mod exponential_smoothing;
pub mod moving_average;

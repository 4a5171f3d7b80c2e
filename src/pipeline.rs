//! End-to-end forecasting pipeline
//!
//! Mirrors the dashboard's run-model flow: detect outliers, reconstruct the
//! series, fit and forecast, optionally adjust to appointment capacity, and
//! extract the capacity threshold at the chosen percentile.

use crate::data::TimeSeries;
use crate::demand::{adjust_forecast_for_appointments, AdjustedForecastRow, DemandConfig};
use crate::error::{ForecastError, Result};
use crate::frequency::Frequency;
use crate::interpolate::{reconstruct, FillStrategy, ReconstructionReport};
use crate::models::{ForecastModel, ForecastRow, TrainedForecastModel};
use crate::outliers::{detect, DetectionMethod, OutlierSet};
use crate::utils::percentile;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Full configuration for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Outlier detection method
    pub method: DetectionMethod,
    /// Detection threshold (method-dependent semantics)
    pub threshold: f64,
    /// Gap-filling strategy
    pub strategy: FillStrategy,
    /// Polynomial degree, required when `strategy` is polynomial
    pub degree: Option<u32>,
    /// Sampling frequency of the series
    pub frequency: Frequency,
    /// Future periods to forecast, in frequency units
    pub horizon: usize,
    /// Confidence level for forecast bounds, in (0, 1)
    pub confidence_level: f64,
    /// Capacity percentile over the future forecast, in (0, 100]
    pub demand_percentile: f64,
    /// Appointment/DNA assumptions; `None` forecasts raw events
    pub demand: Option<DemandConfig>,
}

/// Forecast demand at the configured percentile, with its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemandThreshold {
    pub demand: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Everything a presentation layer needs from one run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub outliers: OutlierSet,
    pub report: ReconstructionReport,
    /// The gap-filled series the model was trained on
    pub series: TimeSeries,
    /// Historical fit plus future horizon
    pub forecast: Vec<ForecastRow>,
    /// Present when demand adjustment was configured
    pub adjusted: Option<Vec<AdjustedForecastRow>>,
    pub threshold: DemandThreshold,
}

/// Run the full pipeline over `series` with the given model.
///
/// The capacity threshold is the configured percentile of the future-only
/// rows (timestamps strictly after the last historical tick), taken over the
/// final adjusted demand when adjustment is configured and over the raw
/// forecast otherwise.
pub fn run<M: ForecastModel>(
    series: &TimeSeries,
    model: &M,
    config: &PipelineConfig,
) -> Result<PipelineOutcome> {
    if !config.demand_percentile.is_finite()
        || config.demand_percentile <= 0.0
        || config.demand_percentile > 100.0
    {
        return Err(ForecastError::InvalidInput(format!(
            "Demand percentile must be in (0, 100], got {}",
            config.demand_percentile
        )));
    }
    if config.horizon == 0 {
        return Err(ForecastError::InvalidInput(
            "Forecast horizon must be at least one period".to_string(),
        ));
    }

    let outliers = detect(series, config.method, config.threshold)?;
    debug!(
        method = %config.method,
        flagged = outliers.len(),
        "outlier detection complete"
    );

    let reconstruction = reconstruct(
        series,
        &outliers,
        config.frequency,
        config.strategy,
        config.degree,
    )?;
    debug!(
        inserted = reconstruction.report.missing_ticks_inserted,
        cleared = reconstruction.report.outliers_cleared,
        unfilled = reconstruction.report.unfilled,
        "reconstruction complete"
    );

    let last_observed = match reconstruction.series.end() {
        Some(ts) => ts,
        None => {
            return Err(ForecastError::InvalidInput(
                "No usable observations remain after reconstruction".to_string(),
            ));
        }
    };

    let trained = model.train(&reconstruction.series)?;
    let forecast = trained.forecast(config.horizon, config.confidence_level, config.frequency)?;
    debug!(model = trained.name(), rows = forecast.len(), "forecast complete");

    let adjusted = match &config.demand {
        Some(demand) => Some(adjust_forecast_for_appointments(&forecast, demand)?),
        None => None,
    };

    // Threshold over future rows only, past the historical fit period
    let (points, lowers, uppers) = match &adjusted {
        Some(rows) => {
            let future: Vec<&AdjustedForecastRow> = rows
                .iter()
                .filter(|row| row.timestamp > last_observed)
                .collect();
            (
                future.iter().map(|r| r.final_adjusted_demand).collect::<Vec<f64>>(),
                future.iter().map(|r| r.final_adjusted_demand_lower).collect::<Vec<f64>>(),
                future.iter().map(|r| r.final_adjusted_demand_upper).collect::<Vec<f64>>(),
            )
        }
        None => {
            let future: Vec<&ForecastRow> = forecast
                .iter()
                .filter(|row| row.timestamp > last_observed)
                .collect();
            (
                future.iter().map(|r| r.yhat).collect::<Vec<f64>>(),
                future.iter().map(|r| r.yhat_lower).collect::<Vec<f64>>(),
                future.iter().map(|r| r.yhat_upper).collect::<Vec<f64>>(),
            )
        }
    };

    if points.is_empty() {
        return Err(ForecastError::InvalidInput(
            "Forecast produced no future rows".to_string(),
        ));
    }

    let threshold = DemandThreshold {
        demand: percentile(&points, config.demand_percentile)?,
        lower: percentile(&lowers, config.demand_percentile)?,
        upper: percentile(&uppers, config.demand_percentile)?,
    };
    debug!(demand = threshold.demand, "capacity threshold extracted");

    Ok(PipelineOutcome {
        outliers,
        report: reconstruction.report,
        series: reconstruction.series,
        forecast,
        adjusted,
        threshold,
    })
}

//! # Demand Forecast
//!
//! A Rust library for demand forecasting and capacity planning over
//! activity-count time series (e.g. daily referrals or attendances).
//!
//! ## Features
//!
//! - Outlier detection (standard-deviation and IQR rules)
//! - Gap-filling and interpolation onto a regular timestamp grid
//!   (linear, time-weighted, polynomial, forward fill, backward fill)
//! - A forecasting-model seam with simple baselines
//!   (exponential smoothing, moving average)
//! - Demand adjustment from raw events to appointment capacity,
//!   with DNA (did-not-attend) and discharge-policy factors
//! - Capacity thresholds at a chosen percentile of the future forecast
//!
//! ## Quick Start
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use demand_forecast::models::exponential_smoothing::ExponentialSmoothing;
//! use demand_forecast::pipeline::{run, PipelineConfig};
//! use demand_forecast::{DetectionMethod, FillStrategy, Frequency};
//!
//! # fn main() -> demand_forecast::Result<()> {
//! // Simulated daily patient counts
//! let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
//! let series = demand_forecast::synthetic::poisson_series(
//!     start, 120, Frequency::Daily, 50.0, 42)?;
//!
//! let config = PipelineConfig {
//!     method: DetectionMethod::Iqr,
//!     threshold: 1.5,
//!     strategy: FillStrategy::Linear,
//!     degree: None,
//!     frequency: Frequency::Daily,
//!     horizon: 28,
//!     confidence_level: 0.95,
//!     demand_percentile: 85.0,
//!     demand: None,
//! };
//!
//! let model = ExponentialSmoothing::new(0.3)?;
//! let outcome = run(&series, &model, &config)?;
//! println!("capacity threshold: {:.1}", outcome.threshold.demand);
//! # Ok(())
//! # }
//! ```

pub mod data;
pub mod demand;
pub mod error;
pub mod frequency;
pub mod interpolate;
pub mod models;
pub mod outliers;
pub mod pipeline;
pub mod synthetic;
pub mod utils;

// Re-export commonly used types
pub use crate::data::{DataLoader, TimeSeries, TimeSeriesPoint};
pub use crate::demand::{adjust_forecast_for_appointments, AdjustedForecastRow, DemandConfig};
pub use crate::error::{ForecastError, Result};
pub use crate::frequency::Frequency;
pub use crate::interpolate::{reconstruct, FillStrategy, Reconstruction, ReconstructionReport};
pub use crate::models::{ForecastModel, ForecastRow, TrainedForecastModel};
pub use crate::outliers::{detect, DetectionMethod, OutlierSet};
pub use crate::pipeline::{DemandThreshold, PipelineConfig, PipelineOutcome};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

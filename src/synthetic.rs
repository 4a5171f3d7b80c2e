//! Synthetic activity data for demos and tests

use crate::data::{TimeSeries, TimeSeriesPoint};
use crate::error::{ForecastError, Result};
use crate::frequency::Frequency;
use chrono::{DateTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Poisson};

/// Generate a seeded Poisson-distributed activity series.
///
/// Identical seeds produce identical series.
pub fn poisson_series(
    start: DateTime<Utc>,
    periods: usize,
    frequency: Frequency,
    lambda: f64,
    seed: u64,
) -> Result<TimeSeries> {
    if !lambda.is_finite() || lambda <= 0.0 {
        return Err(ForecastError::InvalidInput(format!(
            "Poisson lambda must be positive, got {}",
            lambda
        )));
    }

    let poisson = Poisson::new(lambda)
        .map_err(|e| ForecastError::InvalidInput(format!("Invalid Poisson parameter: {}", e)))?;
    let mut rng = StdRng::seed_from_u64(seed);

    let mut points = Vec::with_capacity(periods);
    let mut current = start;
    for _ in 0..periods {
        points.push(TimeSeriesPoint {
            timestamp: current,
            value: poisson.sample(&mut rng),
        });
        current = frequency.next_tick(current)?;
    }

    Ok(TimeSeries::from_points(points))
}

/// Three years of simulated daily patient counts, Poisson(50) from
/// 2020-01-01. This is the demo data set offered out of the box.
pub fn demo_series() -> Result<TimeSeries> {
    let start = Utc
        .with_ymd_and_hms(2020, 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| ForecastError::InvalidInput("Invalid demo start date".to_string()))?;

    poisson_series(start, 3 * 365, Frequency::Daily, 50.0, 42)
}

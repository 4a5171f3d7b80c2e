//! Demand adjustment: converting forecast events to appointment capacity

use crate::error::{ForecastError, Result};
use crate::frequency::Frequency;
use crate::models::ForecastRow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Appointment and attendance assumptions for demand adjustment.
///
/// Immutable once constructed; validation happens in [`DemandConfig::new`]
/// and again on every [`adjust_forecast_for_appointments`] call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandConfig {
    /// Appointments generated per forecast unit (e.g. per referral)
    pub appointments_per_unit: f64,
    /// Did-not-attend rate, in `[0, 1)`
    pub dna_rate: f64,
    /// Whether patients are discharged after repeated non-attendance
    pub discharge_policy: bool,
    /// Permitted DNAs before discharge; required when the policy is active
    pub max_dnas: Option<u32>,
    /// Sampling frequency the assumptions were expressed in
    pub frequency: Frequency,
}

/// A forecast row rescaled from events to appointments.
///
/// `adjusted_*` fields carry the appointments-per-unit and DNA scalings;
/// `final_adjusted_*` additionally carry the discharge-policy factor, and
/// equal the adjusted fields when no policy is active.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjustedForecastRow {
    pub timestamp: DateTime<Utc>,
    pub adjusted_demand: f64,
    pub adjusted_demand_lower: f64,
    pub adjusted_demand_upper: f64,
    pub final_adjusted_demand: f64,
    pub final_adjusted_demand_lower: f64,
    pub final_adjusted_demand_upper: f64,
}

impl DemandConfig {
    /// Create a validated configuration.
    pub fn new(
        appointments_per_unit: f64,
        dna_rate: f64,
        discharge_policy: bool,
        max_dnas: Option<u32>,
        frequency: Frequency,
    ) -> Result<Self> {
        let config = Self {
            appointments_per_unit,
            dna_rate,
            discharge_policy,
            max_dnas,
            frequency,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the configured rates and policy fields are in range.
    pub fn validate(&self) -> Result<()> {
        if !self.appointments_per_unit.is_finite() || self.appointments_per_unit <= 0.0 {
            return Err(ForecastError::InvalidConfig(format!(
                "Appointments per unit must be positive, got {}",
                self.appointments_per_unit
            )));
        }
        if !self.dna_rate.is_finite() || !(0.0..1.0).contains(&self.dna_rate) {
            return Err(ForecastError::InvalidConfig(format!(
                "DNA rate must be in [0, 1), got {}",
                self.dna_rate
            )));
        }
        if self.discharge_policy {
            match self.max_dnas {
                Some(n) if n >= 1 => {}
                Some(n) => {
                    return Err(ForecastError::InvalidConfig(format!(
                        "Max DNAs before discharge must be positive, got {}",
                        n
                    )));
                }
                None => {
                    return Err(ForecastError::InvalidConfig(
                        "Discharge policy is active but max DNAs is not set".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Compounding survival factor `(1 - dna_rate)^max_dnas`, or 1 when no
    /// discharge policy applies.
    fn discharge_rate(&self) -> f64 {
        match (self.discharge_policy, self.max_dnas) {
            (true, Some(n)) => (1.0 - self.dna_rate).powi(n as i32),
            _ => 1.0,
        }
    }
}

/// Rescale forecast rows from events to appointment capacity.
///
/// Each point estimate and bound is multiplied by the appointments-per-unit
/// factor and then by `(1 - dna_rate)`. With an active discharge policy the
/// final fields are further scaled by `(1 - dna_rate)^max_dnas`, treating
/// repeated non-attendance as independent events. All scalings are positive,
/// so bound ordering is preserved.
pub fn adjust_forecast_for_appointments(
    rows: &[ForecastRow],
    config: &DemandConfig,
) -> Result<Vec<AdjustedForecastRow>> {
    config.validate()?;

    let attendance = 1.0 - config.dna_rate;
    let discharge_rate = config.discharge_rate();

    let adjusted = rows
        .iter()
        .map(|row| {
            let adjusted_demand = row.yhat * config.appointments_per_unit * attendance;
            let adjusted_demand_lower = row.yhat_lower * config.appointments_per_unit * attendance;
            let adjusted_demand_upper = row.yhat_upper * config.appointments_per_unit * attendance;

            AdjustedForecastRow {
                timestamp: row.timestamp,
                adjusted_demand,
                adjusted_demand_lower,
                adjusted_demand_upper,
                final_adjusted_demand: adjusted_demand * discharge_rate,
                final_adjusted_demand_lower: adjusted_demand_lower * discharge_rate,
                final_adjusted_demand_upper: adjusted_demand_upper * discharge_rate,
            }
        })
        .collect();

    Ok(adjusted)
}

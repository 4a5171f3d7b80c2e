//! Sampling frequencies and regular timestamp grids

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Datelike, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sampling frequency of a time series.
///
/// Weekly grids tick on Mondays; month-based units step by calendar months,
/// so tick spacing varies with month length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Yearly,
    Quarterly,
    Monthly,
    Weekly,
    Daily,
    Hourly,
    Minute,
    Second,
}

impl Frequency {
    /// The tick immediately following `ts` at this frequency.
    pub fn next_tick(&self, ts: DateTime<Utc>) -> Result<DateTime<Utc>> {
        let next = match self {
            Frequency::Yearly => ts.checked_add_months(Months::new(12)),
            Frequency::Quarterly => ts.checked_add_months(Months::new(3)),
            Frequency::Monthly => ts.checked_add_months(Months::new(1)),
            Frequency::Weekly => ts.checked_add_signed(Duration::weeks(1)),
            Frequency::Daily => ts.checked_add_signed(Duration::days(1)),
            Frequency::Hourly => ts.checked_add_signed(Duration::hours(1)),
            Frequency::Minute => ts.checked_add_signed(Duration::minutes(1)),
            Frequency::Second => ts.checked_add_signed(Duration::seconds(1)),
        };

        next.ok_or_else(|| {
            ForecastError::InvalidInput(format!("Timestamp overflow stepping {} past {}", self, ts))
        })
    }

    /// First grid tick on or after `start`. Weekly grids snap forward to
    /// Monday, keeping the time of day; all other units anchor at `start`.
    fn align(&self, start: DateTime<Utc>) -> Result<DateTime<Utc>> {
        match self {
            Frequency::Weekly => {
                let offset = (7 - start.weekday().num_days_from_monday() as i64) % 7;
                start
                    .checked_add_signed(Duration::days(offset))
                    .ok_or_else(|| {
                        ForecastError::InvalidInput(format!(
                            "Timestamp overflow aligning weekly grid at {}",
                            start
                        ))
                    })
            }
            _ => Ok(start),
        }
    }

    /// Every tick of the regular grid from `start` through `end` inclusive.
    pub fn grid(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<DateTime<Utc>>> {
        let mut ticks = Vec::new();
        let mut current = self.align(start)?;

        while current <= end {
            ticks.push(current);
            current = self.next_tick(current)?;
        }

        Ok(ticks)
    }

    /// Create `horizon` future timestamps continuing past `last`.
    pub fn future_timestamps(
        &self,
        last: DateTime<Utc>,
        horizon: usize,
    ) -> Result<Vec<DateTime<Utc>>> {
        let mut timestamps = Vec::with_capacity(horizon);
        let mut current = last;

        for _ in 0..horizon {
            current = self.next_tick(current)?;
            timestamps.push(current);
        }

        Ok(timestamps)
    }
}

impl FromStr for Frequency {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "year" | "yearly" => Ok(Frequency::Yearly),
            "quarter" | "quarterly" => Ok(Frequency::Quarterly),
            "month" | "monthly" => Ok(Frequency::Monthly),
            "week" | "weekly" => Ok(Frequency::Weekly),
            "day" | "daily" => Ok(Frequency::Daily),
            "hour" | "hourly" => Ok(Frequency::Hourly),
            "minute" | "min" => Ok(Frequency::Minute),
            "second" | "sec" => Ok(Frequency::Second),
            other => Err(ForecastError::InvalidInput(format!(
                "Unsupported frequency: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Yearly => "year",
            Frequency::Quarterly => "quarter",
            Frequency::Monthly => "month",
            Frequency::Weekly => "week",
            Frequency::Daily => "day",
            Frequency::Hourly => "hour",
            Frequency::Minute => "minute",
            Frequency::Second => "second",
        };
        f.write_str(name)
    }
}

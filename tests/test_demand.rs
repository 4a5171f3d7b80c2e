use assert_approx_eq::assert_approx_eq;
use chrono::{DateTime, TimeZone, Utc};
use demand_forecast::demand::{adjust_forecast_for_appointments, DemandConfig};
use demand_forecast::models::ForecastRow;
use demand_forecast::{ForecastError, Frequency};
use rstest::rstest;

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, d, 0, 0, 0).unwrap()
}

fn sample_rows() -> Vec<ForecastRow> {
    vec![
        ForecastRow {
            timestamp: day(1),
            yhat: 10.0,
            yhat_lower: 8.0,
            yhat_upper: 12.0,
        },
        ForecastRow {
            timestamp: day(2),
            yhat: 20.0,
            yhat_lower: 15.0,
            yhat_upper: 25.0,
        },
    ]
}

#[test]
fn test_dna_adjustment_without_discharge_policy() {
    let config = DemandConfig::new(3.0, 0.1, false, None, Frequency::Daily).unwrap();

    let adjusted = adjust_forecast_for_appointments(&sample_rows(), &config).unwrap();

    // 10 events * 3 appointments * 90% attendance
    assert_approx_eq!(adjusted[0].adjusted_demand, 27.0, 1e-10);
    assert_approx_eq!(adjusted[0].adjusted_demand_lower, 21.6, 1e-10);
    assert_approx_eq!(adjusted[0].adjusted_demand_upper, 32.4, 1e-10);

    // Without a policy the final fields equal the adjusted fields
    assert_approx_eq!(adjusted[0].final_adjusted_demand, 27.0, 1e-10);
    assert_approx_eq!(adjusted[0].final_adjusted_demand_lower, 21.6, 1e-10);
    assert_approx_eq!(adjusted[0].final_adjusted_demand_upper, 32.4, 1e-10);
}

#[test]
fn test_discharge_policy_compounds_attendance() {
    let config = DemandConfig::new(3.0, 0.1, true, Some(2), Frequency::Daily).unwrap();

    let adjusted = adjust_forecast_for_appointments(&sample_rows(), &config).unwrap();

    // 27.0 * 0.9^2
    assert_approx_eq!(adjusted[0].final_adjusted_demand, 21.87, 1e-10);
    // The intermediate adjusted fields are untouched by the policy
    assert_approx_eq!(adjusted[0].adjusted_demand, 27.0, 1e-10);
}

#[test]
fn test_timestamps_and_bound_ordering_are_preserved() {
    let config = DemandConfig::new(2.5, 0.15, true, Some(3), Frequency::Daily).unwrap();

    let adjusted = adjust_forecast_for_appointments(&sample_rows(), &config).unwrap();

    assert_eq!(adjusted.len(), 2);
    for (row, original) in adjusted.iter().zip(sample_rows()) {
        assert_eq!(row.timestamp, original.timestamp);
        assert!(row.adjusted_demand_lower <= row.adjusted_demand);
        assert!(row.adjusted_demand <= row.adjusted_demand_upper);
        assert!(row.final_adjusted_demand_lower <= row.final_adjusted_demand);
        assert!(row.final_adjusted_demand <= row.final_adjusted_demand_upper);
    }
}

#[rstest]
#[case(0.0, 0.1, false, None)]
#[case(-2.0, 0.1, false, None)]
#[case(3.0, 1.0, false, None)]
#[case(3.0, -0.1, false, None)]
#[case(3.0, 0.1, true, None)]
#[case(3.0, 0.1, true, Some(0))]
fn test_invalid_configurations_are_rejected(
    #[case] appointments_per_unit: f64,
    #[case] dna_rate: f64,
    #[case] discharge_policy: bool,
    #[case] max_dnas: Option<u32>,
) {
    let result = DemandConfig::new(
        appointments_per_unit,
        dna_rate,
        discharge_policy,
        max_dnas,
        Frequency::Daily,
    );

    assert!(matches!(result, Err(ForecastError::InvalidConfig(_))));
}

#[test]
fn test_adjust_revalidates_configuration() {
    // A config built by hand with out-of-range fields fails at adjust time
    let config = DemandConfig {
        appointments_per_unit: 3.0,
        dna_rate: 1.5,
        discharge_policy: false,
        max_dnas: None,
        frequency: Frequency::Daily,
    };

    let result = adjust_forecast_for_appointments(&sample_rows(), &config);

    assert!(matches!(result, Err(ForecastError::InvalidConfig(_))));
}

#[test]
fn test_zero_dna_rate_only_scales_by_appointments() {
    let config = DemandConfig::new(2.0, 0.0, false, None, Frequency::Daily).unwrap();

    let adjusted = adjust_forecast_for_appointments(&sample_rows(), &config).unwrap();

    assert_approx_eq!(adjusted[1].final_adjusted_demand, 40.0, 1e-10);
}

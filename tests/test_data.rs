use assert_approx_eq::assert_approx_eq;
use chrono::{DateTime, TimeZone, Utc};
use demand_forecast::data::{parse_timestamp, DataLoader};
use demand_forecast::{ForecastError, Frequency, TimeSeries, TimeSeriesPoint};
use std::io::Write;
use tempfile::NamedTempFile;

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, d, 0, 0, 0).unwrap()
}

// Helper function to create a simple activity extract
fn create_sample_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();

    writeln!(file, "ds,y").unwrap();
    writeln!(file, "2023-01-01,48").unwrap();
    writeln!(file, "2023-01-02,52").unwrap();
    writeln!(file, "2023-01-03,50").unwrap();
    writeln!(file, "2023-01-04,55").unwrap();

    file
}

#[test]
fn test_load_csv_with_detected_columns() {
    let file = create_sample_csv();

    let series = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(series.len(), 4);
    assert_eq!(series.start().unwrap(), day(1));
    assert_eq!(series.values(), vec![48.0, 52.0, 50.0, 55.0]);
}

#[test]
fn test_load_csv_with_named_columns() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "clinic,appointment_date,activity_count").unwrap();
    writeln!(file, "north,2023-01-02,30").unwrap();
    writeln!(file, "north,2023-01-01,25").unwrap();

    let series =
        DataLoader::from_csv_with_columns(file.path(), "appointment_date", "activity_count")
            .unwrap();

    // Rows arrive unsorted; the series is ordered by timestamp
    assert_eq!(series.timestamps(), vec![day(1), day(2)]);
    assert_eq!(series.values(), vec![25.0, 30.0]);
}

#[test]
fn test_unknown_column_is_rejected() {
    let file = create_sample_csv();

    let result = DataLoader::from_csv_with_columns(file.path(), "missing", "y");

    assert!(matches!(result, Err(ForecastError::InvalidInput(_))));
}

#[test]
fn test_unparseable_value_is_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "ds,y").unwrap();
    writeln!(file, "2023-01-01,not-a-number").unwrap();

    let result = DataLoader::from_csv(file.path());

    assert!(matches!(result, Err(ForecastError::InvalidInput(_))));
}

#[test]
fn test_missing_file_surfaces_io_error() {
    let result = DataLoader::from_csv("/nonexistent/path.csv");

    assert!(matches!(result, Err(ForecastError::IoError(_))));
}

#[test]
fn test_timestamp_parsing_formats() {
    assert_eq!(parse_timestamp("2023-01-15").unwrap().to_string(), "2023-01-15 00:00:00 UTC");
    assert_eq!(parse_timestamp("01/15/2023").unwrap().to_string(), "2023-01-15 00:00:00 UTC");
    assert_eq!(
        parse_timestamp("2023-01-15T14:30:45").unwrap().to_string(),
        "2023-01-15 14:30:45 UTC"
    );
    assert_eq!(
        parse_timestamp("2023-01-15 14:30:45").unwrap().to_string(),
        "2023-01-15 14:30:45 UTC"
    );

    assert!(parse_timestamp("not-a-date").is_err());
}

#[test]
fn test_series_construction_sorts_points() {
    let points = vec![
        TimeSeriesPoint { timestamp: day(3), value: 3.0 },
        TimeSeriesPoint { timestamp: day(1), value: 1.0 },
        TimeSeriesPoint { timestamp: day(2), value: 2.0 },
    ];

    let series = TimeSeries::from_points(points);

    assert_eq!(series.timestamps(), vec![day(1), day(2), day(3)]);
    assert_eq!(series.value_at(day(2)), Some(2.0));
}

#[test]
fn test_mismatched_lengths_are_rejected() {
    let result = TimeSeries::new(vec![day(1)], vec![1.0, 2.0]);

    assert!(matches!(result, Err(ForecastError::InvalidInput(_))));
}

#[test]
fn test_series_statistics() {
    let series = TimeSeries::new(
        (1..=5).map(day).collect(),
        vec![10.0, 20.0, 30.0, 40.0, 50.0],
    )
    .unwrap();

    assert_approx_eq!(series.mean().unwrap(), 30.0, 1e-10);
    assert_approx_eq!(
        series.population_std_dev().unwrap(),
        (200.0f64).sqrt(),
        1e-10
    );

    assert!(TimeSeries::default().mean().is_err());
}

#[test]
fn test_synthetic_series_is_deterministic() {
    let start = day(1);

    let first =
        demand_forecast::synthetic::poisson_series(start, 50, Frequency::Daily, 50.0, 42).unwrap();
    let second =
        demand_forecast::synthetic::poisson_series(start, 50, Frequency::Daily, 50.0, 42).unwrap();
    let other_seed =
        demand_forecast::synthetic::poisson_series(start, 50, Frequency::Daily, 50.0, 7).unwrap();

    assert_eq!(first, second);
    assert_ne!(first, other_seed);
    assert_eq!(first.len(), 50);
    assert!(first.values().iter().all(|&v| v >= 0.0));
}

#[test]
fn test_synthetic_lambda_validation() {
    let result = demand_forecast::synthetic::poisson_series(day(1), 10, Frequency::Daily, 0.0, 42);

    assert!(matches!(result, Err(ForecastError::InvalidInput(_))));
}

#[test]
fn test_demo_series_shape() {
    let series = demand_forecast::synthetic::demo_series().unwrap();

    assert_eq!(series.len(), 3 * 365);
    assert_eq!(
        series.start().unwrap(),
        Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
    );
}

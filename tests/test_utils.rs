use assert_approx_eq::assert_approx_eq;
use demand_forecast::utils::{percentile, polyfit, polyval, quantile};

#[test]
fn test_quantile_linear_interpolation() {
    let values = vec![50.0, 51.0, 500.0, 49.0];

    // Fractional ranks blend the neighbouring sorted values
    assert_approx_eq!(quantile(&values, 0.25).unwrap(), 49.75, 1e-10);
    assert_approx_eq!(quantile(&values, 0.75).unwrap(), 163.25, 1e-10);
    assert_approx_eq!(quantile(&values, 0.0).unwrap(), 49.0, 1e-10);
    assert_approx_eq!(quantile(&values, 1.0).unwrap(), 500.0, 1e-10);
}

#[test]
fn test_quantile_single_value() {
    assert_approx_eq!(quantile(&[7.0], 0.5).unwrap(), 7.0, 1e-10);
}

#[test]
fn test_quantile_validation() {
    assert!(quantile(&[], 0.5).is_err());
    assert!(quantile(&[1.0], 1.5).is_err());
    assert!(quantile(&[1.0], -0.1).is_err());
    assert!(quantile(&[1.0], f64::NAN).is_err());
}

#[test]
fn test_percentile_matches_quantile() {
    let values = vec![10.0, 20.0, 30.0, 40.0, 50.0];

    assert_approx_eq!(
        percentile(&values, 85.0).unwrap(),
        quantile(&values, 0.85).unwrap(),
        1e-12
    );
    assert_approx_eq!(percentile(&values, 50.0).unwrap(), 30.0, 1e-10);
}

#[test]
fn test_polyfit_recovers_exact_polynomial() {
    // y = 2 + 3x + x^2
    let xs: Vec<f64> = (0..6).map(|i| i as f64).collect();
    let ys: Vec<f64> = xs.iter().map(|x| 2.0 + 3.0 * x + x * x).collect();

    let coefficients = polyfit(&xs, &ys, 2).unwrap();

    assert_approx_eq!(coefficients[0], 2.0, 1e-6);
    assert_approx_eq!(coefficients[1], 3.0, 1e-6);
    assert_approx_eq!(coefficients[2], 1.0, 1e-6);

    assert_approx_eq!(polyval(&coefficients, 10.0), 132.0, 1e-4);
}

#[test]
fn test_polyfit_needs_more_points_than_degree() {
    let xs = vec![0.0, 1.0, 2.0];
    let ys = vec![1.0, 2.0, 3.0];

    assert!(polyfit(&xs, &ys, 3).is_err());
    assert!(polyfit(&xs, &ys[..2], 1).is_err());
}

#[test]
fn test_polyfit_degenerate_points_are_singular() {
    // All x values identical: the normal equations cannot be solved
    let xs = vec![1.0, 1.0, 1.0];
    let ys = vec![1.0, 2.0, 3.0];

    assert!(polyfit(&xs, &ys, 1).is_err());
}

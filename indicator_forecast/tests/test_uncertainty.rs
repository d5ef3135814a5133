use approx::assert_relative_eq;
use chrono::NaiveDate;
use indicator_forecast::uncertainty::{confidence_band, Z_95};
use indicator_forecast::{ForecastError, TimeSeries};

fn daily_series(values: &[f64]) -> TimeSeries {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    TimeSeries::from_pairs(
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| (start + chrono::Duration::days(i as i64), v)),
    )
    .unwrap()
}

#[test]
fn test_band_is_symmetric_with_constant_width() {
    // Sample standard deviation of 2, 4, 4, 4, 5, 5, 7, 9 is sqrt(32 / 7)
    let history = daily_series(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
    let forecast = [10.0, 12.0, 15.0];

    let band = confidence_band(&history, &forecast).unwrap();
    let sigma = (32.0f64 / 7.0).sqrt();

    assert_relative_eq!(band.sigma, sigma, epsilon = 1e-12);
    assert_relative_eq!(band.half_width(), Z_95 * sigma, epsilon = 1e-12);
    for ((point, lower), upper) in forecast.iter().zip(&band.lower).zip(&band.upper) {
        assert_relative_eq!(point - lower, Z_95 * sigma, epsilon = 1e-9);
        assert_relative_eq!(upper - point, Z_95 * sigma, epsilon = 1e-9);
    }
}

#[test]
fn test_band_needs_two_points() {
    let history = daily_series(&[3.0]);
    let result = confidence_band(&history, &[3.0]);

    assert!(matches!(
        result,
        Err(ForecastError::InsufficientHistory { required: 2, actual: 1 })
    ));
}

#[test]
fn test_constant_history_collapses_band() {
    let history = daily_series(&[4.0; 10]);
    let band = confidence_band(&history, &[4.0, 4.0]).unwrap();

    assert_eq!(band.sigma, 0.0);
    assert_eq!(band.lower, vec![4.0, 4.0]);
    assert_eq!(band.upper, vec![4.0, 4.0]);
}

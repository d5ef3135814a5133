use approx::assert_abs_diff_eq;
use chrono::NaiveDate;
use indicator_forecast::features::FeatureSet;
use indicator_forecast::trainer::train;
use indicator_forecast::utils::future_dates;
use indicator_forecast::{ForecastError, IndicatorProfile, Mape, Period, Regressor, TimeSeries};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rstest::rstest;

fn monthly_series(values: &[f64]) -> TimeSeries {
    let start = NaiveDate::from_ymd_opt(2019, 12, 31).unwrap();
    let dates = future_dates(start, values.len(), Period::Monthly).unwrap();
    TimeSeries::new(dates, values.to_vec()).unwrap()
}

fn noisy_trend(len: usize) -> TimeSeries {
    let mut rng = StdRng::seed_from_u64(7);
    let noise = Normal::new(0.0, 1.5).unwrap();
    let values: Vec<f64> = (0..len)
        .map(|i| 50.0 + 0.8 * i as f64 + noise.sample(&mut rng))
        .collect();
    monthly_series(&values)
}

#[rstest]
#[case(false)]
#[case(true)]
fn test_short_history_is_rejected(#[case] trend_mode: bool) {
    let profile = IndicatorProfile::new("IPCA").with_trend_mode(trend_mode);
    let series = monthly_series(&[5.0; 23]);

    match train(&series, &profile) {
        Err(ForecastError::InsufficientHistory { required, actual }) => {
            assert_eq!(required, 24);
            assert_eq!(actual, 23);
        }
        other => panic!("Expected InsufficientHistory, got {:?}", other.map(|o| o.metrics)),
    }
}

#[test]
fn test_non_finite_targets_are_rejected() {
    let mut values = vec![5.0; 30];
    values[10] = f64::NAN;
    let series = monthly_series(&values);

    let result = train(&series, &IndicatorProfile::new("IPCA"));
    assert!(matches!(result, Err(ForecastError::InvalidTarget(_))));
}

#[rstest]
#[case(false, 36, 28, 8)]
#[case(true, 36, 19, 5)]
#[case(false, 24, 19, 5)]
#[case(true, 24, 9, 3)]
fn test_chronological_split_sizes(
    #[case] trend_mode: bool,
    #[case] len: usize,
    #[case] train_size: usize,
    #[case] test_size: usize,
) {
    let profile = IndicatorProfile::new("X").with_trend_mode(trend_mode);
    let outcome = train(&noisy_trend(len), &profile).unwrap();

    assert_eq!(outcome.train_size, train_size);
    assert_eq!(outcome.test_size, test_size);
}

#[rstest]
#[case(false)]
#[case(true)]
fn test_constant_series_is_fit_exactly(#[case] trend_mode: bool) {
    let profile = IndicatorProfile::new("FLAT").with_trend_mode(trend_mode);
    let outcome = train(&monthly_series(&[10.0; 36]), &profile).unwrap();

    assert_abs_diff_eq!(outcome.metrics.mae, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(outcome.metrics.rmse, 0.0, epsilon = 1e-9);
    assert!(outcome.metrics.r2.is_finite());
    assert!(matches!(outcome.metrics.mape, Mape::Computed(v) if v < 1e-9));
}

#[test]
fn test_model_carries_profile_and_frozen_scaler() {
    let profile = IndicatorProfile::new("PIB").with_trend_mode(true);
    let outcome = train(&noisy_trend(48), &profile).unwrap();
    let model = &outcome.model;

    assert_eq!(model.feature_set(), FeatureSet::Trend);
    assert_eq!(model.scaler().width(), FeatureSet::Trend.width());
    assert_eq!(model.ensemble().forest().trees().len(), 200);
    assert!(model.ensemble().base().is_some());
    assert!(model.scaler().scales().iter().all(|s| *s > 0.0));

    // Wrong width is an error, not a panic
    assert!(model.predict_row(&[1.0, 2.0]).is_err());
}

#[test]
fn test_calendar_profile_has_no_linear_base() {
    let outcome = train(&noisy_trend(30), &IndicatorProfile::new("IPCA")).unwrap();

    assert_eq!(outcome.model.feature_set(), FeatureSet::Calendar);
    assert!(outcome.model.ensemble().base().is_none());
    assert_eq!(outcome.model.ensemble().forest().trees().len(), 100);
}

#[test]
fn test_training_is_deterministic() {
    let profile = IndicatorProfile::new("PIB").with_trend_mode(true);
    let series = noisy_trend(40);

    let first = train(&series, &profile).unwrap();
    let second = train(&series, &profile).unwrap();

    assert_eq!(first.metrics, second.metrics);
}

#[test]
fn test_linear_series_is_learned_in_trend_mode() {
    let values: Vec<f64> = (0..36).map(|i| 100.0 + 2.0 * i as f64).collect();
    let profile = IndicatorProfile::new("LINEAR").with_trend_mode(true);

    let outcome = train(&monthly_series(&values), &profile).unwrap();

    assert!(outcome.metrics.rmse < 5.0, "rmse = {}", outcome.metrics.rmse);
}

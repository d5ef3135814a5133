use chrono::{Duration, NaiveDate};
use indicator_forecast::{
    ForecastError, Horizon, IndicatorCatalog, IndicatorPipeline, IndicatorProfile,
    IndicatorRequest, IndicatorTable, Period, TimeSeries, ValueKind,
};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Three observations per month over `months` months, drifting upwards
fn irregular_series(months: usize) -> TimeSeries {
    let mut pairs = Vec::new();
    for m in 0..months {
        let first = date(2020 + (m / 12) as i32, (m % 12) as u32 + 1, 1);
        for (offset, bump) in [(2, 0.0), (11, 0.1), (19, 0.2)] {
            let value = 4.0 + 0.05 * m as f64 + bump;
            pairs.push((first + Duration::days(offset), value));
        }
    }
    TimeSeries::from_unsorted(pairs)
}

fn daily_series(days: usize) -> TimeSeries {
    let start = date(2023, 1, 2);
    TimeSeries::from_pairs(
        (0..days).map(|i| (start + Duration::days(i as i64), 13.65 + (i / 10) as f64 * 0.01)),
    )
    .unwrap()
}

#[test]
fn test_monthly_indicator_outlook() {
    let raw = irregular_series(30);
    let profile = IndicatorProfile::new("IPCA").with_value_kind(ValueKind::Percent);

    let outlook = IndicatorPipeline::run(&raw, &profile, Horizon::new(6).unwrap()).unwrap();

    // Raw points are reduced to one month-end value per month
    assert_eq!(outlook.history.len(), 30);
    assert_eq!(outlook.history.dates()[0], date(2020, 1, 31));
    assert_eq!(outlook.history.values()[0], 4.2);
    assert_eq!(outlook.train_size + outlook.test_size, 30);

    assert_eq!(outlook.forecast.len(), 6);
    assert_eq!(outlook.forecast.dates[0], date(2022, 7, 31));
    assert_eq!(outlook.snapshot.date, date(2022, 6, 30));
    assert!(outlook.snapshot.variation.is_some());
    assert!(outlook.metrics.rmse.is_finite());

    let json: serde_json::Value = serde_json::from_str(&outlook.to_json().unwrap()).unwrap();
    assert_eq!(json["indicator"], "IPCA");
    assert_eq!(json["forecast"]["point"].as_array().unwrap().len(), 6);
}

#[test]
fn test_daily_indicator_trains_on_raw_points() {
    let raw = daily_series(90);
    let profile = IndicatorProfile::new("SELIC").with_cadence(Period::Daily);

    let outlook = IndicatorPipeline::run(&raw, &profile, Horizon::new(3).unwrap()).unwrap();

    assert_eq!(outlook.history.len(), 90);
    // Forecast dates are month ends after the last daily observation
    assert_eq!(raw.last_date(), Some(date(2023, 4, 1)));
    assert_eq!(
        outlook.forecast.dates,
        vec![date(2023, 4, 30), date(2023, 5, 31), date(2023, 6, 30)]
    );
}

#[test]
fn test_short_indicator_fails_without_panicking() {
    let raw = irregular_series(10);
    let result = IndicatorPipeline::run(&raw, &IndicatorProfile::new("INPC"), Horizon::default());

    assert!(matches!(
        result,
        Err(ForecastError::InsufficientHistory { required: 24, actual: 10 })
    ));
}

#[test]
fn test_run_all_matches_sequential_runs() {
    let requests = vec![
        IndicatorRequest::new(IndicatorProfile::new("IPCA"), irregular_series(30)),
        IndicatorRequest::new(
            IndicatorProfile::new("PIB_MENSAL").with_trend_mode(true),
            irregular_series(40),
        ),
        IndicatorRequest::new(IndicatorProfile::new("INPC"), irregular_series(5)),
    ];
    let horizon = Horizon::new(4).unwrap();

    let parallel = IndicatorPipeline::run_all(&requests, horizon);

    let names: Vec<&str> = parallel.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["IPCA", "PIB_MENSAL", "INPC"]);

    for ((_, result), request) in parallel.iter().zip(&requests) {
        let sequential = IndicatorPipeline::run(&request.series, &request.profile, horizon);
        match (result, sequential) {
            (Ok(a), Ok(b)) => {
                assert_eq!(a.forecast, b.forecast);
                assert_eq!(a.metrics, b.metrics);
            }
            (Err(_), Err(_)) => {}
            _ => panic!("{} differed between parallel and sequential runs", request.profile.name),
        }
    }
    assert!(parallel[2].1.is_err());
}

#[test]
fn test_run_table_from_csv() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,IPCA,UNTRACKED").unwrap();
    let series = irregular_series(26);
    for (d, v) in series.iter() {
        writeln!(file, "{},{},1.0", d.format("%Y-%m-%d"), v).unwrap();
    }

    let table = IndicatorTable::from_csv(file.path()).unwrap();
    let catalog = IndicatorCatalog::brazilian_macro();

    let results = IndicatorPipeline::run_table(&table, &catalog, Horizon::new(2).unwrap()).unwrap();

    // Only catalog indicators present in the table are processed
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].0, "IPCA");
    let outlook = results[0].1.as_ref().unwrap();
    assert_eq!(outlook.history.len(), 26);
    assert_eq!(outlook.forecast.len(), 2);
}

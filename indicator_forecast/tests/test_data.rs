use approx::assert_relative_eq;
use chrono::NaiveDate;
use indicator_forecast::data::{parse_date, IndicatorTable, TimeSeries};
use indicator_forecast::ForecastError;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn write_csv(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file
}

#[test]
fn test_time_series_requires_increasing_dates() {
    let ok = TimeSeries::new(vec![date(2023, 1, 1), date(2023, 1, 2)], vec![1.0, 2.0]);
    assert!(ok.is_ok());

    let duplicate = TimeSeries::new(vec![date(2023, 1, 1), date(2023, 1, 1)], vec![1.0, 2.0]);
    assert!(matches!(duplicate, Err(ForecastError::DataError(_))));

    let mismatched = TimeSeries::new(vec![date(2023, 1, 1)], vec![1.0, 2.0]);
    assert!(mismatched.is_err());
}

#[test]
fn test_from_unsorted_keeps_last_duplicate() {
    let series = TimeSeries::from_unsorted(vec![
        (date(2023, 1, 3), 3.0),
        (date(2023, 1, 1), 1.0),
        (date(2023, 1, 3), 30.0),
        (date(2023, 1, 2), 2.0),
    ]);

    assert_eq!(
        series.dates(),
        &[date(2023, 1, 1), date(2023, 1, 2), date(2023, 1, 3)]
    );
    assert_eq!(series.values(), &[1.0, 2.0, 30.0]);
}

#[test]
fn test_time_series_operations() {
    let series = TimeSeries::from_pairs(vec![
        (date(2023, 1, 1), 100.0),
        (date(2023, 1, 2), 103.0),
        (date(2023, 1, 3), 106.0),
    ])
    .unwrap();

    assert_eq!(series.len(), 3);
    assert_eq!(series.last_date(), Some(date(2023, 1, 3)));
    assert_eq!(series.last_value(), Some(106.0));

    let subset = series.slice(1, None).unwrap();
    assert_eq!(subset.values(), &[103.0, 106.0]);
    assert!(series.slice(2, Some(5)).is_err());

    let recent = series.since(date(2023, 1, 2));
    assert_eq!(recent.len(), 2);

    assert_relative_eq!(series.mean().unwrap(), 103.0);
    // Sample standard deviation of 100, 103, 106
    assert_relative_eq!(series.std_dev().unwrap(), 3.0, epsilon = 1e-12);
}

#[test]
fn test_push_rejects_stale_dates() {
    let mut series = TimeSeries::from_pairs(vec![(date(2023, 1, 31), 1.0)]).unwrap();

    assert!(series.push(date(2023, 1, 31), 2.0).is_err());
    series.push(date(2023, 2, 28), 2.0).unwrap();
    assert_eq!(series.len(), 2);
}

#[test]
fn test_std_dev_needs_two_points() {
    let single = TimeSeries::from_pairs(vec![(date(2023, 1, 1), 5.0)]).unwrap();
    assert!(matches!(
        single.std_dev(),
        Err(ForecastError::InsufficientHistory { required: 2, actual: 1 })
    ));
}

#[test]
fn test_parse_date_formats() {
    assert_eq!(parse_date("2024-02-29"), Some(date(2024, 2, 29)));
    assert_eq!(parse_date("29/02/2024"), Some(date(2024, 2, 29)));
    assert_eq!(parse_date("2024-02-29 00:00:00"), Some(date(2024, 2, 29)));
    assert_eq!(parse_date("not a date"), None);
}

#[test]
fn test_table_from_csv_drops_missing_values() {
    let file = write_csv(&[
        "date,SELIC,IPCA",
        "2023-01-03,13.75,",
        "2023-01-01,13.65,0.53",
        "2023-01-02,,0.60",
        "2023-01-04,13.75,0.61",
    ]);

    let table = IndicatorTable::from_csv(file.path()).unwrap();
    assert_eq!(table.date_column(), "date");
    assert_eq!(table.indicator_names(), vec!["SELIC".to_string(), "IPCA".to_string()]);

    let selic = table.series("SELIC").unwrap();
    assert_eq!(
        selic.dates(),
        &[date(2023, 1, 1), date(2023, 1, 3), date(2023, 1, 4)]
    );
    assert_eq!(selic.values(), &[13.65, 13.75, 13.75]);

    let ipca = table.series("IPCA").unwrap();
    assert_eq!(ipca.values(), &[0.53, 0.60, 0.61]);
}

#[test]
fn test_table_detects_unnamed_index_column() {
    let file = write_csv(&[
        "Unnamed: 0,PIB_MENSAL",
        "2023-01-31,800000",
        "2023-02-28,810000",
    ]);

    let table = IndicatorTable::from_csv(file.path()).unwrap();
    let all = table.all_series().unwrap();

    assert_eq!(all.len(), 1);
    assert_eq!(all[0].0, "PIB_MENSAL");
    assert_eq!(all[0].1.values(), &[800000.0, 810000.0]);
}

#[test]
fn test_table_errors() {
    assert!(matches!(
        IndicatorTable::from_csv("nonexistent_file.csv"),
        Err(ForecastError::IoError(_))
    ));

    let file = write_csv(&["date,IPCA", "2023-01-31,0.5"]);
    let table = IndicatorTable::from_csv(file.path()).unwrap();
    assert!(table.series("IGP-M").is_err());
    assert!(table.series("date").is_err());
}

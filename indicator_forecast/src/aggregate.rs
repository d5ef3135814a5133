//! Period aggregation and variation summaries
//!
//! Daily views keep a trailing 30-day window of raw observations. Monthly and
//! yearly views keep one point per calendar bucket, dated at the bucket end.

use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::utils::Period;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use series_math::moving_averages::trailing_means;
use std::cmp::Ordering;

/// Length of the trailing window behind the daily view
pub const DAILY_WINDOW_DAYS: i64 = 30;

/// Collapse a series to the requested period.
///
/// Monthly and yearly buckets hold the last value observed in them; buckets
/// without observations are omitted.
pub fn aggregate(series: &TimeSeries, period: Period) -> Result<TimeSeries> {
    match period {
        Period::Daily => Ok(trailing_window(series)),
        Period::Monthly | Period::Yearly => collapse_buckets(series, period, |bucket| {
            bucket.last().copied().unwrap_or(f64::NAN)
        }),
    }
}

/// One point per bucket holding the bucket mean
pub fn bucket_means(series: &TimeSeries, period: Period) -> Result<TimeSeries> {
    collapse_buckets(series, period, |bucket| {
        bucket.iter().sum::<f64>() / bucket.len() as f64
    })
}

fn trailing_window(series: &TimeSeries) -> TimeSeries {
    match series.last_date() {
        Some(last) => series.since(last - Duration::days(DAILY_WINDOW_DAYS)),
        None => TimeSeries::empty(),
    }
}

fn collapse_buckets<F>(series: &TimeSeries, period: Period, reduce: F) -> Result<TimeSeries>
where
    F: Fn(&[f64]) -> f64,
{
    let mut dates: Vec<NaiveDate> = Vec::new();
    let mut values: Vec<f64> = Vec::new();
    let mut bucket: Vec<f64> = Vec::new();

    for (date, value) in series.iter() {
        let end = period.bucket_end(date)?;
        if dates.last() != Some(&end) {
            if !bucket.is_empty() {
                values.push(reduce(&bucket));
                bucket.clear();
            }
            dates.push(end);
        }
        bucket.push(value);
    }
    if !bucket.is_empty() {
        values.push(reduce(&bucket));
    }

    TimeSeries::new(dates, values)
}

/// Percentage change from the first to the last point
pub fn span_variation(series: &TimeSeries) -> Result<f64> {
    let values = series.values();
    match (values.first(), values.last()) {
        (Some(&first), Some(&last)) if values.len() >= 2 && first != 0.0 => {
            Ok((last / first - 1.0) * 100.0)
        }
        _ => Err(ForecastError::UndefinedVariation {
            points: values.len(),
        }),
    }
}

/// Variation over the aggregated view of a series
pub fn period_variation(series: &TimeSeries, period: Period) -> Result<f64> {
    span_variation(&aggregate(series, period)?)
}

/// Latest value of an indicator and its change from the previous point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    pub date: NaiveDate,
    pub current: f64,
    pub previous: Option<f64>,
    /// Percentage change; absent with one point or a zero previous value
    pub variation: Option<f64>,
}

/// Snapshot comparing the last two observations (daily) or buckets
pub fn latest_change(series: &TimeSeries, period: Period) -> Result<IndicatorSnapshot> {
    let view = match period {
        Period::Daily => series.clone(),
        Period::Monthly | Period::Yearly => aggregate(series, period)?,
    };

    let (date, current) = match (view.last_date(), view.last_value()) {
        (Some(date), Some(value)) => (date, value),
        _ => {
            return Err(ForecastError::InsufficientHistory {
                required: 1,
                actual: 0,
            })
        }
    };

    let previous = view.len().checked_sub(2).map(|i| view.values()[i]);
    let variation = previous
        .filter(|&prev| prev != 0.0)
        .map(|prev| (current / prev - 1.0) * 100.0);

    Ok(IndicatorSnapshot {
        date,
        current,
        previous,
        variation,
    })
}

/// One entity's first-to-last change over a ranking window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntity {
    pub name: String,
    pub first: f64,
    pub last: f64,
    pub variation: f64,
}

/// Best and worst performers, each ordered from the extreme inwards
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VariationRanking {
    pub best: Vec<RankedEntity>,
    pub worst: Vec<RankedEntity>,
}

/// Rank entities by variation over the requested period.
///
/// The daily window is measured back from the latest date across every
/// entity. Monthly and yearly views compare the first and last bucket means.
/// Entities whose variation is undefined are skipped.
pub fn rank_by_variation(
    entities: &[(String, TimeSeries)],
    period: Period,
    top_n: usize,
) -> Result<VariationRanking> {
    let cutoff = entities
        .iter()
        .filter_map(|(_, series)| series.last_date())
        .max()
        .map(|latest| latest - Duration::days(DAILY_WINDOW_DAYS));

    let mut ranked = Vec::with_capacity(entities.len());
    for (name, series) in entities {
        let view = match (period, cutoff) {
            (Period::Daily, Some(cutoff)) => series.since(cutoff),
            (Period::Daily, None) => TimeSeries::empty(),
            (Period::Monthly | Period::Yearly, _) => bucket_means(series, period)?,
        };

        let Ok(variation) = span_variation(&view) else {
            continue;
        };
        if let (Some(&first), Some(&last)) = (view.values().first(), view.values().last()) {
            ranked.push(RankedEntity {
                name: name.clone(),
                first,
                last,
                variation,
            });
        }
    }

    ranked.sort_by(|a, b| {
        b.variation
            .partial_cmp(&a.variation)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });

    let best: Vec<RankedEntity> = ranked.iter().take(top_n).cloned().collect();
    let worst: Vec<RankedEntity> = ranked.iter().rev().take(top_n).cloned().collect();

    Ok(VariationRanking { best, worst })
}

/// Scale a series so its first value equals `base`
pub fn rebase(series: &TimeSeries, base: f64) -> Result<TimeSeries> {
    let first = match series.values().first() {
        Some(&first) if first != 0.0 => first,
        _ => {
            return Err(ForecastError::UndefinedVariation {
                points: series.len(),
            })
        }
    };

    TimeSeries::new(
        series.dates().to_vec(),
        series.values().iter().map(|v| v / first * base).collect(),
    )
}

/// Trailing mean over `window` observations; the first `window - 1` points
/// are omitted
pub fn rolling_mean(series: &TimeSeries, window: usize) -> Result<TimeSeries> {
    let means = trailing_means(series.values(), window)?;

    TimeSeries::from_pairs(
        series
            .dates()
            .iter()
            .zip(means)
            .filter_map(|(&date, mean)| mean.map(|m| (date, m))),
    )
}

//! Feature engineering for indicator series
//!
//! Every observation yields calendar features. In trend mode it also yields
//! lagged values, trailing means and a position index; rows whose lag or
//! mean inputs are not yet available are dropped.

use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::utils::quarter_of;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use series_math::moving_averages::trailing_means;

/// Rows consumed before the longest lag is available
pub const TREND_WARMUP: usize = 12;

/// Calendar features of one date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarFeatures {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// 0 = Monday .. 6 = Sunday
    pub day_of_week: u32,
    /// 1..=4
    pub quarter: u32,
}

impl CalendarFeatures {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            day_of_week: date.weekday().num_days_from_monday(),
            quarter: quarter_of(date.month()),
        }
    }
}

/// Autoregressive features of one observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendFeatures {
    pub lag_1: f64,
    pub lag_3: f64,
    pub lag_12: f64,
    pub ma_3: f64,
    pub ma_6: f64,
    /// Zero-based position of the observation in its series
    pub trend: f64,
}

/// Model inputs of one observation, before column selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureInputs {
    pub calendar: CalendarFeatures,
    pub trend: Option<TrendFeatures>,
}

impl FeatureInputs {
    /// Inputs for a date with no history attached
    pub fn calendar_only(date: NaiveDate) -> Self {
        Self {
            calendar: CalendarFeatures::from_date(date),
            trend: None,
        }
    }
}

/// One retained observation with its target and inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureRow {
    pub date: NaiveDate,
    pub target: f64,
    pub inputs: FeatureInputs,
}

/// A single model input column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureColumn {
    Year,
    Month,
    Day,
    DayOfWeek,
    Quarter,
    Lag1,
    Lag3,
    Lag12,
    Ma3,
    Ma6,
    Trend,
}

impl FeatureColumn {
    /// Read this column; `None` when it needs trend inputs that are absent
    pub fn value(self, inputs: &FeatureInputs) -> Option<f64> {
        let calendar = &inputs.calendar;
        match self {
            FeatureColumn::Year => Some(calendar.year as f64),
            FeatureColumn::Month => Some(calendar.month as f64),
            FeatureColumn::Day => Some(calendar.day as f64),
            FeatureColumn::DayOfWeek => Some(calendar.day_of_week as f64),
            FeatureColumn::Quarter => Some(calendar.quarter as f64),
            FeatureColumn::Lag1 => inputs.trend.map(|t| t.lag_1),
            FeatureColumn::Lag3 => inputs.trend.map(|t| t.lag_3),
            FeatureColumn::Lag12 => inputs.trend.map(|t| t.lag_12),
            FeatureColumn::Ma3 => inputs.trend.map(|t| t.ma_3),
            FeatureColumn::Ma6 => inputs.trend.map(|t| t.ma_6),
            FeatureColumn::Trend => inputs.trend.map(|t| t.trend),
        }
    }
}

const CALENDAR_COLUMNS: [FeatureColumn; 4] = [
    FeatureColumn::Year,
    FeatureColumn::Month,
    FeatureColumn::Day,
    FeatureColumn::Quarter,
];

const TREND_COLUMNS: [FeatureColumn; 9] = [
    FeatureColumn::Year,
    FeatureColumn::Month,
    FeatureColumn::Quarter,
    FeatureColumn::Lag1,
    FeatureColumn::Lag3,
    FeatureColumn::Lag12,
    FeatureColumn::Ma3,
    FeatureColumn::Ma6,
    FeatureColumn::Trend,
];

/// Ordered columns a model is trained on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureSet {
    Calendar,
    Trend,
}

impl FeatureSet {
    pub fn columns(self) -> &'static [FeatureColumn] {
        match self {
            FeatureSet::Calendar => &CALENDAR_COLUMNS,
            FeatureSet::Trend => &TREND_COLUMNS,
        }
    }

    pub fn width(self) -> usize {
        self.columns().len()
    }

    pub fn is_trend(self) -> bool {
        matches!(self, FeatureSet::Trend)
    }

    /// Project inputs onto this set's columns, in order
    pub fn extract(self, inputs: &FeatureInputs) -> Result<Vec<f64>> {
        self.columns()
            .iter()
            .map(|column| {
                column.value(inputs).ok_or_else(|| {
                    ForecastError::InvalidParameter(format!(
                        "Feature {:?} requires trend inputs",
                        column
                    ))
                })
            })
            .collect()
    }
}

/// Build one feature row per retained observation.
///
/// In trend mode the first [`TREND_WARMUP`] observations are consumed as
/// history, so a series of `n > 12` points yields `n - 12` rows.
pub fn build_features(series: &TimeSeries, trend_mode: bool) -> Result<Vec<FeatureRow>> {
    if !trend_mode {
        return Ok(series
            .iter()
            .map(|(date, target)| FeatureRow {
                date,
                target,
                inputs: FeatureInputs::calendar_only(date),
            })
            .collect());
    }

    let values = series.values();
    let ma_3 = trailing_means(values, 3)?;
    let ma_6 = trailing_means(values, 6)?;
    let lag = |i: usize, k: usize| i.checked_sub(k).map(|j| values[j]);

    Ok(series
        .iter()
        .enumerate()
        .filter_map(|(i, (date, target))| {
            let trend = TrendFeatures {
                lag_1: lag(i, 1)?,
                lag_3: lag(i, 3)?,
                lag_12: lag(i, 12)?,
                ma_3: ma_3[i]?,
                ma_6: ma_6[i]?,
                trend: i as f64,
            };

            Some(FeatureRow {
                date,
                target,
                inputs: FeatureInputs {
                    calendar: CalendarFeatures::from_date(date),
                    trend: Some(trend),
                },
            })
        })
        .collect())
}

/// Number of rows [`build_features`] yields for a series of `len` points
pub fn expected_rows(len: usize, trend_mode: bool) -> usize {
    if trend_mode {
        len.saturating_sub(TREND_WARMUP)
    } else {
        len
    }
}

//! Utility functions for the indicator_forecast crate

use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Share of rows held out for evaluation
pub const TEST_FRACTION: f64 = 0.2;

/// Calendar period used for bucketing and for spacing future dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Monthly,
    Yearly,
}

impl Period {
    /// Last date of the bucket containing `date`
    pub fn bucket_end(self, date: NaiveDate) -> Result<NaiveDate> {
        match self {
            Period::Daily => Ok(date),
            Period::Monthly => month_end(date.year(), date.month()),
            Period::Yearly => month_end(date.year(), 12),
        }
    }

    /// First period end strictly after `date`
    pub fn next_end(self, date: NaiveDate) -> Result<NaiveDate> {
        let end = self.bucket_end(date)?;
        if end > date {
            return Ok(end);
        }

        // `date` closes its bucket; the next bucket starts the day after
        let next_day = date
            .succ_opt()
            .ok_or_else(|| ForecastError::InvalidParameter(format!("No date after {}", date)))?;
        self.bucket_end(next_day)
    }
}

/// Last day of the given month
pub fn month_end(year: i32, month: u32) -> Result<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .ok_or_else(|| {
            ForecastError::InvalidParameter(format!("Invalid month {}-{}", year, month))
        })
}

/// `horizon` successive period ends strictly after `last_date`
pub fn future_dates(last_date: NaiveDate, horizon: usize, period: Period) -> Result<Vec<NaiveDate>> {
    let mut dates = Vec::with_capacity(horizon);
    let mut current = last_date;

    for _ in 0..horizon {
        current = period.next_end(current)?;
        dates.push(current);
    }

    Ok(dates)
}

/// Number of rows held out for a dataset of `len` rows (rounded up)
pub fn test_size(len: usize, test_ratio: f64) -> usize {
    ((len as f64 * test_ratio).ceil() as usize).min(len)
}

/// Split data chronologically: the earliest rows train, the latest rows test
pub fn train_test_split<T>(data: &[T], test_ratio: f64) -> Result<(&[T], &[T])> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(ForecastError::InvalidParameter(format!(
            "Test ratio must be in (0, 1), got {}",
            test_ratio
        )));
    }

    let test_len = test_size(data.len(), test_ratio);
    if test_len == 0 || test_len == data.len() {
        return Err(ForecastError::InsufficientHistory {
            required: 2,
            actual: data.len(),
        });
    }

    Ok(data.split_at(data.len() - test_len))
}

/// Quarter of the year (1..=4) for a month (1..=12)
pub fn quarter_of(month: u32) -> u32 {
    (month - 1) / 3 + 1
}

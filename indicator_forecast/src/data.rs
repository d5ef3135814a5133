//! Time series data handling for forecasting

use crate::error::{ForecastError, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use serde::Serialize;
use statrs::statistics::Statistics;
use std::fs::File;
use std::path::Path;

/// Ordered `(date, value)` observations of one indicator.
///
/// Dates are strictly increasing. The forecasting core never mutates a
/// caller's series; operations that extend a series work on a clone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Create a series from aligned dates and values
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(ForecastError::DataError(format!(
                "Dates length ({}) doesn't match values length ({})",
                dates.len(),
                values.len()
            )));
        }

        if let Some(pos) = dates.windows(2).position(|w| w[1] <= w[0]) {
            return Err(ForecastError::DataError(format!(
                "Dates must be strictly increasing: {} is followed by {}",
                dates[pos],
                dates[pos + 1]
            )));
        }

        Ok(Self { dates, values })
    }

    /// Create a series from `(date, value)` pairs already in order
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let (dates, values) = pairs.into_iter().unzip();
        Self::new(dates, values)
    }

    /// Create a series from pairs in any order.
    ///
    /// Pairs are sorted by date; when a date repeats, the last pair wins.
    pub fn from_unsorted<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let mut pairs: Vec<(NaiveDate, f64)> = pairs.into_iter().collect();
        // Stable sort keeps input order among equal dates
        pairs.sort_by_key(|(date, _)| *date);

        let mut dates: Vec<NaiveDate> = Vec::with_capacity(pairs.len());
        let mut values: Vec<f64> = Vec::with_capacity(pairs.len());
        for (date, value) in pairs {
            if dates.last() == Some(&date) {
                if let Some(last) = values.last_mut() {
                    *last = value;
                }
            } else {
                dates.push(date);
                values.push(value);
            }
        }

        Self { dates, values }
    }

    /// An empty series
    pub fn empty() -> Self {
        Self {
            dates: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Get the dates
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Get the values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate over `(date, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// Get the length of the time series
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the time series is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// First observed date
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    /// Last observed date
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Last observed value
    pub fn last_value(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Append an observation dated after the last one
    pub fn push(&mut self, date: NaiveDate, value: f64) -> Result<()> {
        if let Some(last) = self.last_date() {
            if date <= last {
                return Err(ForecastError::DataError(format!(
                    "Cannot append {} after {}",
                    date, last
                )));
            }
        }

        self.dates.push(date);
        self.values.push(value);
        Ok(())
    }

    /// Get a slice of the data from start to end index
    pub fn slice(&self, start: usize, end: Option<usize>) -> Result<Self> {
        let end = end.unwrap_or(self.len());
        if start > end || end > self.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "Slice {}..{} out of bounds for length {}",
                start,
                end,
                self.len()
            )));
        }

        Ok(Self {
            dates: self.dates[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
        })
    }

    /// Observations dated on or after `date`
    pub fn since(&self, date: NaiveDate) -> Self {
        let start = self.dates.partition_point(|d| *d < date);
        Self {
            dates: self.dates[start..].to_vec(),
            values: self.values[start..].to_vec(),
        }
    }

    /// Whether every value is finite
    pub fn all_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }

    /// Calculate the mean of the values
    pub fn mean(&self) -> Result<f64> {
        if self.is_empty() {
            return Err(ForecastError::InsufficientHistory {
                required: 1,
                actual: 0,
            });
        }

        Ok(self.values.iter().mean())
    }

    /// Sample standard deviation of the values (divides by `n - 1`)
    pub fn std_dev(&self) -> Result<f64> {
        if self.len() < 2 {
            return Err(ForecastError::InsufficientHistory {
                required: 2,
                actual: self.len(),
            });
        }

        Ok(self.values.iter().std_dev())
    }
}

/// Wide table of indicators: one date column plus one column per indicator.
///
/// This is the boundary with the data-acquisition side. Values are coerced
/// to numbers and missing entries are dropped when a series is extracted.
#[derive(Debug, Clone)]
pub struct IndicatorTable {
    df: DataFrame,
    date_column: String,
}

impl IndicatorTable {
    /// Load an indicator table from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Self::from_dataframe(df)
    }

    /// Wrap an existing DataFrame
    pub fn from_dataframe(df: DataFrame) -> Result<Self> {
        let date_column = Self::detect_date_column(&df)?;
        Ok(Self { df, date_column })
    }

    /// Detect the date column in a DataFrame
    fn detect_date_column(df: &DataFrame) -> Result<String> {
        for name in df.get_column_names() {
            let lower_name = name.to_lowercase();
            if lower_name.contains("date")
                || lower_name.contains("time")
                || lower_name == "data"
                || lower_name == "unnamed: 0"
            {
                return Ok(name.to_string());
            }
        }

        // Fall back to a leading temporal or text column (a saved index)
        if let Some(first_col) = df.get_columns().first() {
            if first_col.dtype().is_temporal() || first_col.dtype() == &DataType::Utf8 {
                return Ok(first_col.name().to_string());
            }
        }

        Err(ForecastError::DataError(
            "No date column found in data".to_string(),
        ))
    }

    /// Get the DataFrame
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Get the date column name
    pub fn date_column(&self) -> &str {
        &self.date_column
    }

    /// Names of every indicator column
    pub fn indicator_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .into_iter()
            .filter(|name| *name != self.date_column)
            .map(|name| name.to_string())
            .collect()
    }

    /// Extract one indicator, dropping rows with a missing date or value
    pub fn series(&self, indicator: &str) -> Result<TimeSeries> {
        if indicator == self.date_column {
            return Err(ForecastError::DataError(format!(
                "'{}' is the date column",
                indicator
            )));
        }

        let dates = self.parse_dates()?;
        let col = self.df.column(indicator).map_err(|e| {
            ForecastError::DataError(format!("Column '{}' not found: {}", indicator, e))
        })?;
        let numeric = col.cast(&DataType::Float64)?;
        let values: Vec<Option<f64>> = numeric.f64()?.into_iter().collect();

        let pairs = dates
            .into_iter()
            .zip(values)
            .filter_map(|(date, value)| match (date, value) {
                (Some(date), Some(value)) if value.is_finite() => Some((date, value)),
                _ => None,
            });

        Ok(TimeSeries::from_unsorted(pairs))
    }

    /// Extract every indicator column
    pub fn all_series(&self) -> Result<Vec<(String, TimeSeries)>> {
        self.indicator_names()
            .into_iter()
            .map(|name| {
                let series = self.series(&name)?;
                Ok((name, series))
            })
            .collect()
    }

    /// Parse the date column; unparseable entries become `None`
    fn parse_dates(&self) -> Result<Vec<Option<NaiveDate>>> {
        let col = self.df.column(&self.date_column)?;

        match col.dtype() {
            DataType::Utf8 => Ok(col
                .utf8()?
                .into_iter()
                .map(|opt| opt.and_then(parse_date))
                .collect()),
            DataType::Date => Ok(epoch_days_to_dates(col)?),
            dtype if dtype.is_temporal() => {
                let as_date = col.cast(&DataType::Date)?;
                epoch_days_to_dates(&as_date)
            }
            other => Err(ForecastError::DataError(format!(
                "Column '{}' of type {} cannot be read as dates",
                self.date_column, other
            ))),
        }
    }
}

fn epoch_days_to_dates(col: &Series) -> Result<Vec<Option<NaiveDate>>> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)
        .ok_or_else(|| ForecastError::DataError("Invalid epoch".to_string()))?;

    Ok(col
        .date()?
        .into_iter()
        .map(|opt_days| {
            opt_days.and_then(|days| epoch.checked_add_signed(Duration::days(days as i64)))
        })
        .collect())
}

/// Parse a date in ISO (`2024-01-31`, optionally with a time) or
/// day-first (`31/01/2024`) form
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

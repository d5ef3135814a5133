//! Multi-step forecasting
//!
//! Calendar models predict every future date independently. Trend models
//! feed each prediction back into the series before the next step, because
//! their lag and moving-average inputs depend on the previous values.

use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::features::{build_features, CalendarFeatures, FeatureInputs, FeatureSet, TREND_WARMUP};
use crate::models::Regressor;
use crate::profile::IndicatorProfile;
use crate::trainer::TrainedModel;
use crate::uncertainty::confidence_band;
use crate::utils::future_dates;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

/// Number of future periods to forecast (1..=12)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Horizon(usize);

impl Horizon {
    pub const MIN: usize = 1;
    pub const MAX: usize = 12;

    pub fn new(steps: usize) -> Result<Self> {
        if !(Self::MIN..=Self::MAX).contains(&steps) {
            return Err(ForecastError::InvalidParameter(format!(
                "Horizon must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                steps
            )));
        }
        Ok(Self(steps))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for Horizon {
    fn default() -> Self {
        Self(6)
    }
}

/// Point forecast and band, aligned on ascending future dates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    pub dates: Vec<NaiveDate>,
    pub point: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl ForecastResult {
    pub fn len(&self) -> usize {
        self.point.len()
    }

    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }

    /// The point forecast as a series
    pub fn point_series(&self) -> Result<TimeSeries> {
        TimeSeries::new(self.dates.clone(), self.point.clone())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Inputs used and value produced by one recursive step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosedLoopStep {
    pub date: NaiveDate,
    pub features: Vec<f64>,
    pub prediction: f64,
}

/// Predictions of a recursive run with the per-step trace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosedLoopRun {
    pub steps: Vec<ClosedLoopStep>,
    /// Input series extended with every prediction
    pub extended: TimeSeries,
}

impl ClosedLoopRun {
    pub fn predictions(&self) -> Vec<f64> {
        self.steps.iter().map(|step| step.prediction).collect()
    }
}

/// Forecast `horizon` periods after the last observation of `series`.
///
/// `series` must be the series the model was trained on.
pub fn forecast(
    model: &TrainedModel,
    series: &TimeSeries,
    profile: &IndicatorProfile,
    horizon: Horizon,
) -> Result<ForecastResult> {
    let expected = profile.model_profile().feature_set;
    if model.feature_set() != expected {
        return Err(ForecastError::InvalidParameter(format!(
            "Model uses {:?} features but {} expects {:?}",
            model.feature_set(),
            profile.name,
            expected
        )));
    }

    let last_date = series.last_date().ok_or(ForecastError::InsufficientHistory {
        required: 1,
        actual: 0,
    })?;
    let dates = future_dates(last_date, horizon.get(), profile.forecast_period)?;

    let point = match model.feature_set() {
        FeatureSet::Calendar => open_loop_forecast(model, FeatureSet::Calendar, &dates)?,
        FeatureSet::Trend => closed_loop_forecast(model, series, &dates)?.predictions(),
    };
    let band = confidence_band(series, &point)?;

    debug!(
        indicator = %profile.name,
        steps = point.len(),
        sigma = band.sigma,
        "Forecast complete"
    );

    Ok(ForecastResult {
        dates,
        point,
        lower: band.lower,
        upper: band.upper,
    })
}

/// Predict each date from its calendar features alone
pub fn open_loop_forecast<R: Regressor>(
    model: &R,
    feature_set: FeatureSet,
    dates: &[NaiveDate],
) -> Result<Vec<f64>> {
    let rows: Vec<Vec<f64>> = dates
        .iter()
        .map(|&date| feature_set.extract(&FeatureInputs::calendar_only(date)))
        .collect::<Result<_>>()?;

    model.predict_rows(&rows)
}

/// Inputs for the step that forecasts `date` from `working`.
///
/// Features are rebuilt on the whole working series and the latest row is
/// moved to `date`: its calendar fields become those of `date` and its trend
/// index becomes the working series length.
pub fn next_closed_loop_row(working: &TimeSeries, date: NaiveDate) -> Result<FeatureInputs> {
    let rows = build_features(working, true)?;
    let latest = rows.last().ok_or(ForecastError::InsufficientHistory {
        required: TREND_WARMUP + 1,
        actual: working.len(),
    })?;

    let mut trend = latest.inputs.trend.ok_or_else(|| {
        ForecastError::InvalidParameter("Trend features missing from rebuilt row".to_string())
    })?;
    trend.trend = working.len() as f64;

    Ok(FeatureInputs {
        calendar: CalendarFeatures::from_date(date),
        trend: Some(trend),
    })
}

/// Forecast `dates` one at a time, appending each prediction to an owned
/// copy of `series` before the next step
pub fn closed_loop_forecast<R: Regressor>(
    model: &R,
    series: &TimeSeries,
    dates: &[NaiveDate],
) -> Result<ClosedLoopRun> {
    let mut working = series.clone();
    let mut steps = Vec::with_capacity(dates.len());

    for &date in dates {
        let inputs = next_closed_loop_row(&working, date)?;
        let features = FeatureSet::Trend.extract(&inputs)?;
        let prediction = model.predict_row(&features)?;

        if !prediction.is_finite() {
            return Err(ForecastError::FitFailed(format!(
                "Non-finite prediction for {}",
                date
            )));
        }

        debug!(%date, prediction, "Recursive step");
        working.push(date, prediction)?;
        steps.push(ClosedLoopStep {
            date,
            features,
            prediction,
        });
    }

    Ok(ClosedLoopRun {
        steps,
        extended: working,
    })
}

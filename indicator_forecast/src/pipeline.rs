//! End-to-end outlook per indicator

use crate::aggregate::{aggregate, latest_change, IndicatorSnapshot};
use crate::data::{IndicatorTable, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::forecaster::{forecast, ForecastResult, Horizon};
use crate::metrics::ForecastMetrics;
use crate::profile::{IndicatorCatalog, IndicatorProfile};
use crate::trainer::train;
use crate::utils::Period;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, instrument, warn};

/// Everything the presentation layer shows for one indicator
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorOutlook {
    pub indicator: String,
    pub snapshot: IndicatorSnapshot,
    pub metrics: ForecastMetrics,
    pub forecast: ForecastResult,
    /// Series the model was trained on
    pub history: TimeSeries,
    pub train_size: usize,
    pub test_size: usize,
}

impl IndicatorOutlook {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// One indicator to process
#[derive(Debug, Clone)]
pub struct IndicatorRequest {
    pub profile: IndicatorProfile,
    pub series: TimeSeries,
}

impl IndicatorRequest {
    pub fn new(profile: IndicatorProfile, series: TimeSeries) -> Self {
        Self { profile, series }
    }
}

/// Train, forecast and summarise indicators
pub struct IndicatorPipeline;

impl IndicatorPipeline {
    /// Produce the outlook for one indicator.
    ///
    /// Monthly indicators are first reduced to month-end values so that the
    /// model sees one point per period.
    #[instrument(skip_all, fields(indicator = %profile.name))]
    pub fn run(
        series: &TimeSeries,
        profile: &IndicatorProfile,
        horizon: Horizon,
    ) -> Result<IndicatorOutlook> {
        let history = match profile.cadence {
            Period::Monthly => aggregate(series, Period::Monthly)?,
            Period::Daily | Period::Yearly => series.clone(),
        };

        let outcome = train(&history, profile)?;
        let snapshot = latest_change(series, profile.cadence)?;
        let forecast = forecast(&outcome.model, &history, profile, horizon)?;

        info!(
            points = history.len(),
            horizon = horizon.get(),
            "Outlook ready"
        );

        Ok(IndicatorOutlook {
            indicator: profile.name.clone(),
            snapshot,
            metrics: outcome.metrics,
            forecast,
            history,
            train_size: outcome.train_size,
            test_size: outcome.test_size,
        })
    }

    /// Process independent indicators in parallel; results keep request order
    pub fn run_all(
        requests: &[IndicatorRequest],
        horizon: Horizon,
    ) -> Vec<(String, Result<IndicatorOutlook>)> {
        requests
            .par_iter()
            .map(|request| {
                let result = Self::run(&request.series, &request.profile, horizon);
                if let Err(err) = &result {
                    log_failure(&request.profile.name, err);
                }
                (request.profile.name.clone(), result)
            })
            .collect()
    }

    /// Process every catalog indicator present in `table`
    pub fn run_table(
        table: &IndicatorTable,
        catalog: &IndicatorCatalog,
        horizon: Horizon,
    ) -> Result<Vec<(String, Result<IndicatorOutlook>)>> {
        let available = table.indicator_names();
        let mut requests = Vec::new();

        for profile in catalog.iter() {
            match available.iter().find(|name| name.eq_ignore_ascii_case(&profile.name)) {
                Some(column) => {
                    requests.push(IndicatorRequest::new(profile.clone(), table.series(column)?))
                }
                None => warn!(indicator = %profile.name, "Indicator missing from table"),
            }
        }

        Ok(Self::run_all(&requests, horizon))
    }
}

fn log_failure(indicator: &str, err: &ForecastError) {
    if err.is_insufficient_history() {
        info!(indicator, error = %err, "Skipping indicator without enough history");
    } else {
        warn!(indicator, error = %err, "Indicator outlook failed");
    }
}

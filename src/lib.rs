//! # Indicator Outlook
//!
//! `indicator_outlook` bundles the workspace crates behind one entry point:
//! [`math`] holds the numeric primitives and [`forecast`] the forecasting core.
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use indicator_outlook::prelude::*;
//!
//! let start = NaiveDate::from_ymd_opt(2021, 12, 31).unwrap();
//! let dates = indicator_outlook::forecast::utils::future_dates(start, 30, Period::Monthly).unwrap();
//! let values: Vec<f64> = (0..30).map(|i| 4.0 + 0.1 * (i % 6) as f64).collect();
//! let series = TimeSeries::new(dates, values).unwrap();
//!
//! let outlook = indicator_outlook::outlook("IPCA", &series, Horizon::new(3).unwrap()).unwrap();
//! assert_eq!(outlook.forecast.len(), 3);
//! assert!(outlook.forecast.lower[0] <= outlook.forecast.point[0]);
//! ```

pub use indicator_forecast as forecast;
pub use series_math as math;

use indicator_forecast::{
    Horizon, IndicatorCatalog, IndicatorOutlook, IndicatorPipeline, IndicatorProfile, Result,
    TimeSeries,
};

/// Commonly used types
pub mod prelude {
    pub use indicator_forecast::{
        ForecastError, ForecastMetrics, ForecastResult, Horizon, IndicatorCatalog,
        IndicatorOutlook, IndicatorPipeline, IndicatorProfile, IndicatorRequest, IndicatorTable,
        Mape, Period, TimeSeries, ValueKind,
    };
}

/// Profile for `name` from the Brazilian macro catalog, or a monthly
/// calendar profile when the name is not catalogued
pub fn profile_for(name: &str) -> IndicatorProfile {
    IndicatorCatalog::brazilian_macro()
        .get(name)
        .cloned()
        .unwrap_or_else(|| IndicatorProfile::new(name))
}

/// Outlook for one indicator using its catalogued profile
pub fn outlook(name: &str, series: &TimeSeries, horizon: Horizon) -> Result<IndicatorOutlook> {
    IndicatorPipeline::run(series, &profile_for(name), horizon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indicator_forecast::Period;

    #[test]
    fn test_profile_for_catalogued_indicator() {
        let pib = profile_for("PIB_MENSAL");
        assert!(pib.trend_mode);

        let cdi = profile_for("cdi");
        assert_eq!(cdi.cadence, Period::Daily);
    }

    #[test]
    fn test_profile_for_unknown_indicator() {
        let profile = profile_for("IBC-BR");
        assert_eq!(profile.name, "IBC-BR");
        assert!(!profile.trend_mode);
        assert_eq!(profile.cadence, Period::Monthly);
    }

    #[test]
    fn test_outlook_reports_short_history() {
        let series = TimeSeries::empty();
        let result = outlook("IPCA", &series, Horizon::default());
        assert!(result.is_err());
    }
}

//! # Indicator Forecast
//!
//! Feature engineering and ensemble forecasting for macroeconomic indicator
//! series (policy rates, inflation indices, monthly GDP).
//!
//! ## Features
//!
//! - Period aggregation (daily window, month-end, year-end) and variations
//! - Calendar and autoregressive feature construction
//! - Ridge-plus-random-forest ensemble with a chronological hold-out
//! - Open-loop and recursive multi-step forecasts with 95% bands
//! - Parallel end-to-end outlooks across indicators
//!
//! ## Forecasting Modes
//!
//! Each indicator carries an [`IndicatorProfile`]. Its `trend_mode` flag picks
//! one of two fixed model profiles:
//!
//! - **Calendar**: year, month, day and quarter; every future date is
//!   predicted independently.
//! - **Trend**: adds lags 1/3/12, 3- and 6-period means and a position index;
//!   forecasts are recursive, each step feeding the next.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use indicator_forecast::{Horizon, IndicatorCatalog, IndicatorPipeline, IndicatorTable};
//!
//! let table = IndicatorTable::from_csv("indicators.csv")?;
//! let catalog = IndicatorCatalog::brazilian_macro();
//!
//! for (name, outlook) in IndicatorPipeline::run_table(&table, &catalog, Horizon::new(6)?)? {
//!     match outlook {
//!         Ok(outlook) => println!("{}: {:?}", name, outlook.forecast.point),
//!         Err(err) => println!("{}: unavailable ({})", name, err),
//!     }
//! }
//! # Ok::<(), indicator_forecast::ForecastError>(())
//! ```

pub mod aggregate;
pub mod data;
pub mod error;
pub mod features;
pub mod forecaster;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod profile;
pub mod scaler;
pub mod trainer;
pub mod uncertainty;
pub mod utils;

// Re-export commonly used types
pub use crate::aggregate::{IndicatorSnapshot, VariationRanking};
pub use crate::data::{IndicatorTable, TimeSeries};
pub use crate::error::{ForecastError, Result};
pub use crate::features::{FeatureRow, FeatureSet};
pub use crate::forecaster::{ForecastResult, Horizon};
pub use crate::metrics::{ForecastMetrics, Mape, MapeGuard};
pub use crate::models::Regressor;
pub use crate::pipeline::{IndicatorOutlook, IndicatorPipeline, IndicatorRequest};
pub use crate::profile::{IndicatorCatalog, IndicatorProfile, ModelProfile, ValueKind};
pub use crate::trainer::{TrainedModel, TrainingOutcome};
pub use crate::uncertainty::ConfidenceBand;
pub use crate::utils::Period;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

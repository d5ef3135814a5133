//! Indicator profiles and the fixed model profiles they select

use crate::error::{ForecastError, Result};
use crate::features::FeatureSet;
use crate::models::EnsembleParams;
use crate::utils::Period;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Minimum observations required before training
pub const MIN_HISTORY: usize = 24;
/// Seed shared by both model profiles
pub const DEFAULT_SEED: u64 = 42;
/// L2 penalty of the trend profile's linear base
pub const LINEAR_BASE_PENALTY: f64 = 1e-3;

/// Feature set and ensemble hyperparameters trained together
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelProfile {
    pub feature_set: FeatureSet,
    pub ensemble: EnsembleParams,
}

/// Lagged, smoothed and trend features with a linear base under 200 shallow trees
pub static TREND_PROFILE: ModelProfile = ModelProfile {
    feature_set: FeatureSet::Trend,
    ensemble: EnsembleParams {
        n_trees: 200,
        max_depth: Some(10),
        min_samples_split: 2,
        seed: DEFAULT_SEED,
        linear_penalty: Some(LINEAR_BASE_PENALTY),
    },
};

/// Calendar features only, 100 fully grown trees
pub static CALENDAR_PROFILE: ModelProfile = ModelProfile {
    feature_set: FeatureSet::Calendar,
    ensemble: EnsembleParams {
        n_trees: 100,
        max_depth: None,
        min_samples_split: 2,
        seed: DEFAULT_SEED,
        linear_penalty: None,
    },
};

impl ModelProfile {
    pub fn for_trend_mode(trend_mode: bool) -> &'static ModelProfile {
        if trend_mode {
            &TREND_PROFILE
        } else {
            &CALENDAR_PROFILE
        }
    }
}

/// How an indicator's values are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Percent,
    Currency,
    #[default]
    Plain,
}

impl ValueKind {
    pub fn format(self, value: f64) -> String {
        match self {
            ValueKind::Percent => format!("{:.2}%", value),
            ValueKind::Currency => format!("R$ {:.2}", value),
            ValueKind::Plain => format!("{:.2}", value),
        }
    }
}

fn default_min_history() -> usize {
    MIN_HISTORY
}

fn default_forecast_period() -> Period {
    Period::Monthly
}

/// Per-indicator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorProfile {
    pub name: String,
    #[serde(default)]
    pub trend_mode: bool,
    #[serde(skip_deserializing, default = "default_min_history")]
    pub min_history: usize,
    /// Native sampling of the raw series
    pub cadence: Period,
    /// Spacing of forecast dates
    #[serde(default = "default_forecast_period")]
    pub forecast_period: Period,
    #[serde(default)]
    pub value_kind: ValueKind,
}

impl IndicatorProfile {
    /// Monthly, calendar-only profile with plain values
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            trend_mode: false,
            min_history: MIN_HISTORY,
            cadence: Period::Monthly,
            forecast_period: Period::Monthly,
            value_kind: ValueKind::Plain,
        }
    }

    pub fn with_trend_mode(mut self, trend_mode: bool) -> Self {
        self.trend_mode = trend_mode;
        self
    }

    pub fn with_cadence(mut self, cadence: Period) -> Self {
        self.cadence = cadence;
        self
    }

    pub fn with_forecast_period(mut self, period: Period) -> Self {
        self.forecast_period = period;
        self
    }

    pub fn with_value_kind(mut self, value_kind: ValueKind) -> Self {
        self.value_kind = value_kind;
        self
    }

    pub fn model_profile(&self) -> &'static ModelProfile {
        ModelProfile::for_trend_mode(self.trend_mode)
    }
}

/// Named set of indicator profiles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorCatalog {
    indicators: Vec<IndicatorProfile>,
}

impl IndicatorCatalog {
    /// Build a catalog, rejecting empty or repeated names
    pub fn new(indicators: Vec<IndicatorProfile>) -> Result<Self> {
        let mut seen = HashSet::new();
        for profile in &indicators {
            if profile.name.trim().is_empty() {
                return Err(ForecastError::InvalidParameter(
                    "Indicator name cannot be empty".to_string(),
                ));
            }
            if !seen.insert(profile.name.to_ascii_uppercase()) {
                return Err(ForecastError::InvalidParameter(format!(
                    "Duplicate indicator '{}'",
                    profile.name
                )));
            }
        }

        Ok(Self { indicators })
    }

    /// Brazilian macro indicators tracked by the dashboard
    pub fn brazilian_macro() -> Self {
        let percent = |name: &str, cadence: Period| {
            IndicatorProfile::new(name)
                .with_cadence(cadence)
                .with_value_kind(ValueKind::Percent)
        };

        Self {
            indicators: vec![
                percent("SELIC", Period::Daily),
                percent("IPCA", Period::Monthly),
                percent("IGP-M", Period::Monthly),
                percent("INPC", Period::Monthly),
                percent("CDI", Period::Daily),
                IndicatorProfile::new("PIB_MENSAL")
                    .with_trend_mode(true)
                    .with_value_kind(ValueKind::Currency),
            ],
        }
    }

    /// Load from `{"indicators": [...]}`
    pub fn from_json(json: &str) -> Result<Self> {
        let parsed: IndicatorCatalog = serde_json::from_str(json)?;
        Self::new(parsed.indicators)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Look up a profile by name, ignoring case
    pub fn get(&self, name: &str) -> Option<&IndicatorProfile> {
        self.indicators
            .iter()
            .find(|profile| profile.name.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndicatorProfile> {
        self.indicators.iter()
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }
}

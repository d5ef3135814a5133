//! Model training with a chronological hold-out split

use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::features::{build_features, FeatureInputs, FeatureSet};
use crate::metrics::{evaluate, ForecastMetrics, Mape};
use crate::models::{EnsembleModel, Regressor};
use crate::profile::{IndicatorProfile, ModelProfile};
use crate::scaler::StandardScaler;
use crate::utils::{train_test_split, TEST_FRACTION};
use tracing::{debug, info, warn};

/// Ensemble bundled with the scaler fitted on its training split.
///
/// Raw feature vectors go in; scaling always happens with the frozen
/// training parameters.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    profile: ModelProfile,
    scaler: StandardScaler,
    ensemble: EnsembleModel,
}

impl TrainedModel {
    pub fn feature_set(&self) -> FeatureSet {
        self.profile.feature_set
    }

    pub fn profile(&self) -> &ModelProfile {
        &self.profile
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn ensemble(&self) -> &EnsembleModel {
        &self.ensemble
    }

    /// Select this model's columns from `inputs` and predict
    pub fn predict_inputs(&self, inputs: &FeatureInputs) -> Result<f64> {
        self.predict_row(&self.feature_set().extract(inputs)?)
    }
}

impl Regressor for TrainedModel {
    fn predict_row(&self, row: &[f64]) -> Result<f64> {
        let scaled = self.scaler.transform(row)?;
        self.ensemble.predict_row(&scaled)
    }
}

/// Trained model with its hold-out evaluation
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub model: TrainedModel,
    pub metrics: ForecastMetrics,
    pub train_size: usize,
    pub test_size: usize,
}

/// Train the profile's ensemble on `series` and score it on the latest 20%
pub fn train(series: &TimeSeries, profile: &IndicatorProfile) -> Result<TrainingOutcome> {
    if series.len() < profile.min_history {
        return Err(ForecastError::InsufficientHistory {
            required: profile.min_history,
            actual: series.len(),
        });
    }
    if !series.all_finite() {
        return Err(ForecastError::InvalidTarget(format!(
            "{} contains missing or infinite values",
            profile.name
        )));
    }

    let model_profile = *profile.model_profile();
    let feature_set = model_profile.feature_set;
    debug!(
        indicator = %profile.name,
        feature_set = ?feature_set,
        trees = model_profile.ensemble.n_trees,
        "Selected model profile"
    );

    let rows = build_features(series, feature_set.is_trend())?;
    let inputs: Vec<Vec<f64>> = rows
        .iter()
        .map(|row| feature_set.extract(&row.inputs))
        .collect::<Result<_>>()?;
    let targets: Vec<f64> = rows.iter().map(|row| row.target).collect();

    let (train_x, test_x) = train_test_split(&inputs, TEST_FRACTION)?;
    let (train_y, test_y) = targets.split_at(train_x.len());

    let scaler = StandardScaler::fit(train_x)?;
    let scaled_train = scaler.transform_rows(train_x)?;
    let scaled_test = scaler.transform_rows(test_x)?;

    let mut ensemble = EnsembleModel::new(model_profile.ensemble)?;
    ensemble.fit(&scaled_train, train_y)?;

    let predictions = ensemble.predict_rows(&scaled_test)?;
    let metrics = evaluate(test_y, &predictions)?;

    info!(
        indicator = %profile.name,
        train = train_x.len(),
        test = test_x.len(),
        mae = metrics.mae,
        rmse = metrics.rmse,
        r2 = metrics.r2,
        "Trained forecast model"
    );
    if let Mape::Unavailable(reason) = metrics.mape {
        warn!(indicator = %profile.name, %reason, "MAPE unavailable");
    }

    Ok(TrainingOutcome {
        model: TrainedModel {
            profile: model_profile,
            scaler,
            ensemble,
        },
        metrics,
        train_size: train_x.len(),
        test_size: test_x.len(),
    })
}

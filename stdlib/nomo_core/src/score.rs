use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::band::RiskBand;
use crate::error::ConfigurationError;
use crate::input::InputVector;
use crate::model::ScoringModel;

/// Magnitude at which the logit is clamped before exponentiation.
///
/// The bound keeps `exp` far from overflow. Realistic clinical inputs never
/// reach it, so moving it would only change behavior for extreme inputs.
pub const LOGIT_SATURATION: f64 = 50.0;

/// Outcome of a single scoring call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Probability in `[0, 1]`.
    pub probability: f64,
    /// Linear predictor before clamping.
    pub logit: f64,
    pub risk_band: RiskBand,
}

impl ScoreResult {
    pub fn from_logit(logit: f64) -> Self {
        let probability = sigmoid(logit);
        Self {
            probability,
            logit,
            risk_band: RiskBand::from_probability(probability),
        }
    }

    /// True when the logit fell outside the saturation bound.
    pub fn is_saturated(&self) -> bool {
        self.logit.abs() > LOGIT_SATURATION
    }
}

/// Logistic link with the logit clamped to `±LOGIT_SATURATION`.
pub fn sigmoid(logit: f64) -> f64 {
    let z = logit.clamp(-LOGIT_SATURATION, LOGIT_SATURATION);
    1.0 / (1.0 + (-z).exp())
}

/// `intercept + Σ weight·value`, summed in feature-name order.
pub fn linear_predictor(
    model: &ScoringModel,
    inputs: &InputVector,
) -> Result<f64, ConfigurationError> {
    let mut logit = model.intercept();
    let mut missing = Vec::new();
    for (name, weight) in model.weights() {
        match inputs.get(name) {
            Some(x) => logit += weight * x,
            None => missing.push(name.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(ConfigurationError::MissingFeatures(missing));
    }
    Ok(logit)
}

/// Scores `inputs` against `model`.
///
/// Only the weighted features are read; extra keys in `inputs` are ignored.
/// Use [`ScoringModel::check_inputs`] to reject them up front.
pub fn score(
    model: &ScoringModel,
    inputs: &InputVector,
) -> Result<ScoreResult, ConfigurationError> {
    let logit = linear_predictor(model, inputs)?;
    let result = ScoreResult::from_logit(logit);
    if result.is_saturated() {
        warn!("logit {logit} saturated at ±{LOGIT_SATURATION}");
    }
    debug!(
        "scored {} features: logit={:.4} p={:.4} band={}",
        model.len(),
        logit,
        result.probability,
        result.risk_band
    );
    Ok(result)
}

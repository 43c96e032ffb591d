use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ConfigurationError, ModelError};
use crate::input::InputVector;

/// Intercept plus one coefficient per named feature.
///
/// Weights are kept in a sorted map so every evaluation sums the terms in
/// the same order. Once built a model is never mutated; share it behind an
/// `Arc` when several callers score against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawModel", into = "RawModel")]
pub struct ScoringModel {
    intercept: f64,
    weights: BTreeMap<String, f64>,
}

#[derive(Serialize, Deserialize)]
struct RawModel {
    intercept: f64,
    weights: BTreeMap<String, f64>,
}

impl TryFrom<RawModel> for ScoringModel {
    type Error = ModelError;

    fn try_from(raw: RawModel) -> Result<Self, Self::Error> {
        ScoringModel::new(raw.intercept, raw.weights)
    }
}

impl From<ScoringModel> for RawModel {
    fn from(model: ScoringModel) -> Self {
        RawModel {
            intercept: model.intercept,
            weights: model.weights,
        }
    }
}

impl ScoringModel {
    pub fn new<I, K>(intercept: f64, weights: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        if !intercept.is_finite() {
            return Err(ModelError::NonFiniteCoefficient {
                name: "intercept".to_string(),
                value: intercept,
            });
        }
        let mut map = BTreeMap::new();
        for (name, value) in weights {
            let name = name.into();
            if name.trim().is_empty() {
                return Err(ModelError::EmptyFeatureName);
            }
            if !value.is_finite() {
                return Err(ModelError::NonFiniteCoefficient { name, value });
            }
            map.insert(name, value);
        }
        if map.is_empty() {
            return Err(ModelError::NoFeatures);
        }
        Ok(Self {
            intercept,
            weights: map,
        })
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn weight(&self, feature: &str) -> Option<f64> {
        self.weights.get(feature).copied()
    }

    /// Features with their coefficients, in evaluation order.
    pub fn weights(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.weights.iter().map(|(k, w)| (k.as_str(), *w))
    }

    pub fn feature_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.weights.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Features the model needs that `inputs` does not provide.
    pub fn missing_features(&self, inputs: &InputVector) -> Vec<String> {
        self.weights
            .keys()
            .filter(|k| inputs.get(k).is_none())
            .cloned()
            .collect()
    }

    /// Strict key check: the inputs must name exactly the weighted features.
    pub fn check_inputs(&self, inputs: &InputVector) -> Result<(), ConfigurationError> {
        let missing = self.missing_features(inputs);
        if !missing.is_empty() {
            return Err(ConfigurationError::MissingFeatures(missing));
        }
        let unexpected: Vec<String> = inputs
            .keys()
            .filter(|k| !self.weights.contains_key(*k))
            .map(str::to_string)
            .collect();
        if !unexpected.is_empty() {
            return Err(ConfigurationError::UnexpectedFeatures(unexpected));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tidal() -> ScoringModel {
        ScoringModel::new(
            -10.0,
            [("FeNO", 0.06), ("RR", 0.09), ("PTEF", 0.01), ("Wheeze", 1.80)],
        )
        .unwrap()
    }

    #[test]
    fn construction_keeps_features_sorted() {
        let model = tidal();
        let names: Vec<&str> = model.feature_names().collect();
        assert_eq!(names, vec!["FeNO", "PTEF", "RR", "Wheeze"]);
        assert_eq!(model.len(), 4);
        assert_eq!(model.weight("RR"), Some(0.09));
        assert_eq!(model.weight("Age"), None);
    }

    #[test]
    fn rejects_degenerate_models() {
        let empty: [(&str, f64); 0] = [];
        assert_eq!(ScoringModel::new(0.0, empty), Err(ModelError::NoFeatures));
        assert_eq!(
            ScoringModel::new(0.0, [("", 1.0)]),
            Err(ModelError::EmptyFeatureName)
        );
        assert!(matches!(
            ScoringModel::new(f64::NAN, [("FeNO", 1.0)]),
            Err(ModelError::NonFiniteCoefficient { .. })
        ));
        assert!(matches!(
            ScoringModel::new(0.0, [("FeNO", f64::INFINITY)]),
            Err(ModelError::NonFiniteCoefficient { .. })
        ));
    }

    #[test]
    fn strict_check_reports_missing_before_unexpected() {
        let model = tidal();
        let partial = InputVector::new().with("FeNO", 20.0).with("Age", 3.0);
        match model.check_inputs(&partial) {
            Err(ConfigurationError::MissingFeatures(missing)) => {
                assert_eq!(missing, vec!["PTEF", "RR", "Wheeze"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let extra = InputVector::new()
            .with("FeNO", 20.0)
            .with("RR", 25.0)
            .with("PTEF", 150.0)
            .with("Wheeze", 0.0)
            .with("Age", 3.0);
        assert_eq!(
            model.check_inputs(&extra),
            Err(ConfigurationError::UnexpectedFeatures(vec!["Age".into()]))
        );
    }

    #[test]
    fn deserialization_validates_coefficients() {
        let ok: ScoringModel =
            serde_json::from_str(r#"{"intercept": 0.5, "weights": {"FeNO": 0.03}}"#).unwrap();
        assert_eq!(ok.intercept(), 0.5);

        let err = serde_json::from_str::<ScoringModel>(r#"{"intercept": 0.5, "weights": {}}"#);
        assert!(err.is_err());
    }
}

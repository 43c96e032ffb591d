//! Coefficient sets shipped with the calculator.
//!
//! These numbers come from published nomograms. Do not edit them in place:
//! a corrected or refitted set is registered under a new version.

use nomo_core::{ModelError, ScoringModel};
use std::collections::BTreeMap;

use crate::definition::ModelDefinition;
use crate::metadata::{FeatureSpec, ModelVersion};

/// Model selected when configuration names none.
pub const DEFAULT_MODEL_ID: &str = "ahr-tidal";

const AHR_CITATION: &str = "Qin J, et al. Predicting Airway Hyperresponsiveness in Preschool \
Asthma: A Nomogram Based on FeNO and Tidal Breathing Parameters. Children's Hospital of \
Chongqing Medical University.";

/// Four-parameter nomogram: FeNO, respiratory rate, PTEF/TEF25 and wheeze.
pub fn ahr_tidal() -> Result<ModelDefinition, ModelError> {
    let model = ScoringModel::new(
        -10.0,
        [("FeNO", 0.06), ("RR", 0.09), ("PTEF", 0.01), ("Wheeze", 1.80)],
    )?;
    Ok(ModelDefinition {
        id: "ahr-tidal".to_string(),
        version: ModelVersion::new(1, 0, 0),
        title: "Nomogram for Predicting Airway Hyperresponsiveness (AHR)".to_string(),
        titles: BTreeMap::from([("zh".to_string(), "预测气道高反应性的列线图".to_string())]),
        citation: Some(AHR_CITATION.to_string()),
        model,
        features: vec![
            FeatureSpec::continuous("FeNO", 0.0, 200.0, "ppb").with_default(20.0),
            FeatureSpec::continuous("RR", 10.0, 80.0, "bpm").with_default(25.0),
            FeatureSpec::continuous("PTEF", 40.0, 350.0, "%").with_default(150.0),
            FeatureSpec::binary("Wheeze"),
        ],
    })
}

/// Seven-parameter revision adding age, atopic history and TPTEF/TE.
pub fn ahr_clinical() -> Result<ModelDefinition, ModelError> {
    let model = ScoringModel::new(
        0.87,
        [
            ("FeNO", 0.03),
            ("Age", -0.04),
            ("FamilyHistory", 1.36),
            ("Rhinitis", 0.53),
            ("Allergy", 0.85),
            ("TPTEF_TE", -0.03),
            ("Wheeze", 1.35),
        ],
    )?;
    Ok(ModelDefinition {
        id: "ahr-clinical".to_string(),
        version: ModelVersion::new(2, 0, 0),
        title: "Clinical Nomogram for Predicting Airway Hyperresponsiveness (AHR)".to_string(),
        titles: BTreeMap::from([(
            "zh".to_string(),
            "预测气道高反应性的临床列线图".to_string(),
        )]),
        citation: None,
        model,
        features: vec![
            FeatureSpec::continuous("FeNO", 0.0, 200.0, "ppb"),
            FeatureSpec::continuous("Age", 0.0, 48.0, "months"),
            FeatureSpec::continuous("TPTEF_TE", 0.0, 100.0, "%"),
            FeatureSpec::binary("Wheeze"),
            FeatureSpec::binary("FamilyHistory"),
            FeatureSpec::binary("Rhinitis"),
            FeatureSpec::binary("Allergy"),
        ],
    })
}

pub fn builtin_models() -> Result<Vec<ModelDefinition>, ModelError> {
    Ok(vec![ahr_tidal()?, ahr_clinical()?])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_definitions_are_consistent() {
        for def in builtin_models().unwrap() {
            assert_eq!(def.validate(), Ok(()), "{}", def.key());
            assert!((3..=7).contains(&def.model.len()));
            assert_ne!(def.title_in("zh"), def.title);
        }
    }

    #[test]
    fn default_model_is_builtin() {
        let ids: Vec<String> = builtin_models()
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert!(ids.iter().any(|id| id == DEFAULT_MODEL_ID));
    }
}

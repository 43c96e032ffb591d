use nomo_core::ScoringModel;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::metadata::{FeatureKind, FeatureSpec, ModelVersion};

/// A published coefficient set plus the form metadata for its features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDefinition {
    pub id: String,
    pub version: ModelVersion,
    pub title: String,
    /// Translated titles keyed by language code, e.g. `"zh"`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub titles: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,
    pub model: ScoringModel,
    pub features: Vec<FeatureSpec>,
}

impl ModelDefinition {
    /// `id@version`, the registry key.
    pub fn key(&self) -> String {
        format!("{}@{}", self.id, self.version)
    }

    /// Title in the language `code`, falling back to [`Self::title`].
    pub fn title_in(&self, code: &str) -> &str {
        self.titles.get(code).map_or(self.title.as_str(), String::as_str)
    }

    pub fn feature(&self, key: &str) -> Option<&FeatureSpec> {
        self.features.iter().find(|f| f.key == key)
    }

    /// Checks that the form metadata and the coefficients describe the same
    /// features and that every declared range and default is usable.
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() || self.id.contains('@') {
            return Err(format!("invalid model id '{}'", self.id));
        }

        let mut seen = BTreeSet::new();
        for spec in &self.features {
            if !seen.insert(spec.key.as_str()) {
                return Err(format!("feature '{}' declared twice", spec.key));
            }
            if let FeatureKind::Continuous { min, max, .. } = &spec.kind {
                if !(min.is_finite() && max.is_finite() && min <= max) {
                    return Err(format!(
                        "feature '{}' has an invalid range [{min}, {max}]",
                        spec.key
                    ));
                }
            }
            if let Some(d) = spec.default {
                if !spec.accepts(d) {
                    return Err(format!(
                        "default {d} for feature '{}' is outside its range",
                        spec.key
                    ));
                }
            }
        }

        let weighted: BTreeSet<&str> = self.model.feature_names().collect();
        if let Some(missing) = weighted.difference(&seen).next() {
            return Err(format!("weighted feature '{missing}' has no form metadata"));
        }
        if let Some(extra) = seen.difference(&weighted).next() {
            return Err(format!("feature '{extra}' has no coefficient"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(features: Vec<FeatureSpec>) -> ModelDefinition {
        ModelDefinition {
            id: "demo".into(),
            version: ModelVersion::new(1, 0, 0),
            title: "Demo".into(),
            titles: BTreeMap::from([("zh".to_string(), "演示".to_string())]),
            citation: None,
            model: ScoringModel::new(0.0, [("FeNO", 0.1), ("Wheeze", 1.0)]).unwrap(),
            features,
        }
    }

    #[test]
    fn matching_metadata_validates() {
        let def = definition(vec![
            FeatureSpec::continuous("FeNO", 0.0, 200.0, "ppb"),
            FeatureSpec::binary("Wheeze"),
        ]);
        assert_eq!(def.validate(), Ok(()));
        assert_eq!(def.key(), "demo@1.0.0");
        assert!(def.feature("Wheeze").unwrap().is_binary());
        assert_eq!(def.title_in("zh"), "演示");
        assert_eq!(def.title_in("fr"), "Demo");
    }

    #[test]
    fn mismatched_metadata_is_rejected() {
        let missing = definition(vec![FeatureSpec::binary("Wheeze")]);
        assert!(missing.validate().unwrap_err().contains("FeNO"));

        let extra = definition(vec![
            FeatureSpec::continuous("FeNO", 0.0, 200.0, "ppb"),
            FeatureSpec::binary("Wheeze"),
            FeatureSpec::binary("Rhinitis"),
        ]);
        assert!(extra.validate().unwrap_err().contains("Rhinitis"));

        let twice = definition(vec![
            FeatureSpec::binary("Wheeze"),
            FeatureSpec::binary("Wheeze"),
        ]);
        assert!(twice.validate().unwrap_err().contains("twice"));
    }

    #[test]
    fn bad_ranges_and_defaults_are_rejected() {
        let inverted = definition(vec![
            FeatureSpec::continuous("FeNO", 200.0, 0.0, "ppb"),
            FeatureSpec::binary("Wheeze"),
        ]);
        assert!(inverted.validate().is_err());

        let bad_default = definition(vec![
            FeatureSpec::continuous("FeNO", 0.0, 200.0, "ppb").with_default(250.0),
            FeatureSpec::binary("Wheeze"),
        ]);
        assert!(bad_default.validate().unwrap_err().contains("default"));
    }
}

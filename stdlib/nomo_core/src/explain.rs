use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::input::InputVector;
use crate::model::ScoringModel;
use crate::score::{score, ScoreResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    pub feature: String,
    pub weight: f64,
    pub value: f64,
    /// `weight * value`, the feature's share of the logit.
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub intercept: f64,
    pub contributions: Vec<FeatureContribution>,
    pub result: ScoreResult,
}

impl Explanation {
    /// Contributions ordered by absolute size, largest first.
    pub fn ranked(&self) -> Vec<&FeatureContribution> {
        let mut out: Vec<&FeatureContribution> = self.contributions.iter().collect();
        out.sort_by(|a, b| b.contribution.abs().total_cmp(&a.contribution.abs()));
        out
    }
}

/// Per-feature breakdown of a score; the contributions and the intercept sum
/// to `result.logit`.
pub fn explain(
    model: &ScoringModel,
    inputs: &InputVector,
) -> Result<Explanation, ConfigurationError> {
    let result = score(model, inputs)?;
    let contributions = model
        .weights()
        .filter_map(|(name, weight)| {
            inputs.get(name).map(|value| FeatureContribution {
                feature: name.to_string(),
                weight,
                value,
                contribution: weight * value,
            })
        })
        .collect();

    Ok(Explanation {
        intercept: model.intercept(),
        contributions,
        result,
    })
}

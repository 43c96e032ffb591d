use nomo_core::{explain, ConfigurationError, Explanation, InputVector};
use nomo_display::ScoreView;
use nomo_models::{ModelDefinition, ModelRegistry, RegistryError};
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;
use thiserror::Error;

use crate::collector::{collect, json_answers, CollectError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Collect(#[from] CollectError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed input file: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// 1 when the patient answers were rejected, 2 for setup failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Collect(CollectError::Configuration(_)) => 2,
            AppError::Collect(_) => 1,
            _ => 2,
        }
    }
}

/// Everything produced by one scoring request.
#[derive(Debug, Clone)]
pub struct Report {
    pub definition: Arc<ModelDefinition>,
    pub inputs: InputVector,
    pub explanation: Explanation,
    pub view: ScoreView,
}

impl Report {
    pub fn to_json(&self, with_contributions: bool) -> JsonValue {
        let mut out = json!({
            "model": self.definition.key(),
            "probability_percent": self.view.probability_percent,
            "risk_band": self.view.risk_band,
            "gradient_marker_position": self.view.gradient_marker_position,
            "probability": self.explanation.result.probability,
            "logit": self.explanation.result.logit,
            "inputs": self.inputs,
        });
        if with_contributions {
            out["intercept"] = json!(self.explanation.intercept);
            out["contributions"] = json!(self.explanation.contributions);
        }
        out
    }
}

/// Resolves the model, collects the answers and scores them.
///
/// `answers` are applied on top of `input` (a JSON object), so a flag can
/// override a value from a file.
pub fn evaluate(
    registry: &ModelRegistry,
    selector: &str,
    input: Option<&JsonValue>,
    answers: &[(String, String)],
) -> Result<Report, AppError> {
    let definition = registry.resolve(selector)?;
    let mut all = match input {
        Some(value) => json_answers(value)?,
        None => Vec::new(),
    };
    all.extend_from_slice(answers);
    let inputs = collect(&definition, &all)?;
    let explanation = explain(&definition.model, &inputs)?;
    let view = ScoreView::from(&explanation.result);
    Ok(Report {
        definition,
        inputs,
        explanation,
        view,
    })
}

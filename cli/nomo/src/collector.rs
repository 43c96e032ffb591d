//! Turns raw form answers into a validated [`InputVector`].
//!
//! Clinical ranges are enforced here; the scorer only checks feature names.

use log::debug;
use nomo_core::{ConfigurationError, InputVector};
use nomo_display::parse_yes_no;
use nomo_models::{FeatureKind, FeatureSpec, ModelDefinition};
use serde_json::Value as JsonValue;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CollectError {
    #[error("'{0}' is not of the form KEY=VALUE")]
    BadAssignment(String),
    #[error("unknown field '{key}' for model {model}")]
    UnknownField { key: String, model: String },
    #[error("no value given for '{0}'")]
    MissingValue(String),
    #[error("'{value}' is not a number (field '{key}')")]
    NotANumber { key: String, value: String },
    #[error("'{value}' is not a yes/no answer (field '{key}')")]
    NotAFlag { key: String, value: String },
    #[error("{key} = {value} is outside the accepted range {min} to {max}")]
    OutOfRange {
        key: String,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("input file must hold a JSON object of field values")]
    NotAnObject,
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Splits `KEY=VALUE`, trimming both sides.
pub fn parse_assignment(text: &str) -> Result<(String, String), CollectError> {
    match text.split_once('=') {
        Some((k, v)) if !k.trim().is_empty() => Ok((k.trim().to_string(), v.trim().to_string())),
        _ => Err(CollectError::BadAssignment(text.to_string())),
    }
}

fn find_spec<'a>(definition: &'a ModelDefinition, key: &str) -> Option<&'a FeatureSpec> {
    definition
        .feature(key)
        .or_else(|| definition.features.iter().find(|f| f.key.eq_ignore_ascii_case(key)))
}

fn parse_value(spec: &FeatureSpec, raw: &str) -> Result<f64, CollectError> {
    let value = match &spec.kind {
        // Numbers go through the 0/1 range check; words through yes/no.
        FeatureKind::Binary => match raw.trim().parse::<f64>() {
            Ok(number) => number,
            Err(_) => match parse_yes_no(raw) {
                Some(true) => 1.0,
                Some(false) => 0.0,
                None => {
                    return Err(CollectError::NotAFlag {
                        key: spec.key.clone(),
                        value: raw.to_string(),
                    })
                }
            },
        },
        FeatureKind::Continuous { .. } => {
            raw.parse::<f64>().map_err(|_| CollectError::NotANumber {
                key: spec.key.clone(),
                value: raw.to_string(),
            })?
        }
    };
    check_range(spec, value)
}

fn check_range(spec: &FeatureSpec, value: f64) -> Result<f64, CollectError> {
    if spec.accepts(value) {
        return Ok(value);
    }
    let (min, max) = match &spec.kind {
        FeatureKind::Continuous { min, max, .. } => (*min, *max),
        FeatureKind::Binary => (0.0, 1.0),
    };
    Err(CollectError::OutOfRange {
        key: spec.key.clone(),
        value,
        min,
        max,
    })
}

/// Builds the input vector for `definition` from `KEY=VALUE` answers.
///
/// Keys match case-insensitively; a later answer for the same key wins.
/// Fields left unanswered take their declared default, otherwise collection
/// fails. The result always passes [`nomo_core::ScoringModel::check_inputs`].
pub fn collect(
    definition: &ModelDefinition,
    answers: &[(String, String)],
) -> Result<InputVector, CollectError> {
    let mut inputs = InputVector::new();
    for (key, raw) in answers {
        let spec = find_spec(definition, key).ok_or_else(|| CollectError::UnknownField {
            key: key.clone(),
            model: definition.key(),
        })?;
        inputs.insert(spec.key.clone(), parse_value(spec, raw)?);
    }

    for spec in &definition.features {
        if inputs.get(&spec.key).is_some() {
            continue;
        }
        match spec.default {
            Some(d) => {
                debug!("{}: using default {d}", spec.key);
                inputs.insert(spec.key.clone(), d);
            }
            None => return Err(CollectError::MissingValue(spec.key.clone())),
        }
    }

    definition.model.check_inputs(&inputs)?;
    Ok(inputs)
}

/// Flattens a JSON object such as `{"FeNO": 20, "Wheeze": "yes"}` into
/// `KEY=VALUE` answers.
pub fn json_answers(value: &JsonValue) -> Result<Vec<(String, String)>, CollectError> {
    let object = value.as_object().ok_or(CollectError::NotAnObject)?;
    Ok(object
        .iter()
        .map(|(k, v)| {
            let text = match v {
                JsonValue::String(s) => s.clone(),
                other => other.to_string(),
            };
            (k.clone(), text)
        })
        .collect())
}

/// Same as [`collect`] for answers given as a JSON object.
pub fn collect_json(
    definition: &ModelDefinition,
    value: &JsonValue,
) -> Result<InputVector, CollectError> {
    collect(definition, &json_answers(value)?)
}

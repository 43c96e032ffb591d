use thiserror::Error;

/// Raised when the inputs handed to a model do not line up with its weights.
///
/// This is an integration defect between the form collector and the active
/// model, never a problem with the patient values themselves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("input is missing required feature(s): {}", .0.join(", "))]
    MissingFeatures(Vec<String>),
    #[error("input carries feature(s) unknown to the model: {}", .0.join(", "))]
    UnexpectedFeatures(Vec<String>),
}

/// Errors raised while constructing a [`crate::ScoringModel`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("model must declare at least one weighted feature")]
    NoFeatures,
    #[error("feature name must not be empty")]
    EmptyFeatureName,
    #[error("coefficient for '{name}' is not finite: {value}")]
    NonFiniteCoefficient { name: String, value: f64 },
}

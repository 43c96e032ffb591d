//! Logistic risk scoring for clinical nomograms.
//!
//! A [`ScoringModel`] holds an intercept and one weight per named feature.
//! [`score`] turns an [`InputVector`] into a bounded probability and a
//! [`RiskBand`]; [`explain`] breaks the same computation down per feature.

pub mod band;
pub mod error;
pub mod explain;
pub mod input;
pub mod model;
pub mod score;

pub use band::{RiskBand, HIGH_THRESHOLD, MODERATE_THRESHOLD};
pub use error::{ConfigurationError, ModelError};
pub use explain::{explain, Explanation, FeatureContribution};
pub use input::InputVector;
pub use model::ScoringModel;
pub use score::{linear_predictor, score, sigmoid, ScoreResult, LOGIT_SATURATION};

use nomo_core::{RiskBand, ScoreResult};
use serde::{Deserialize, Serialize};

/// What a display surface needs from a score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreView {
    /// Probability in percent with one decimal place, e.g. `"39.4"`.
    pub probability_percent: String,
    pub risk_band: RiskBand,
    /// Marker position on the 0-100 gradient bar.
    pub gradient_marker_position: f64,
}

impl From<&ScoreResult> for ScoreView {
    fn from(result: &ScoreResult) -> Self {
        Self {
            probability_percent: format_percent(result.probability),
            risk_band: result.risk_band,
            gradient_marker_position: (result.probability * 100.0).clamp(0.0, 100.0),
        }
    }
}

/// Formats a probability in `[0, 1]` as a percentage with one decimal.
pub fn format_percent(probability: f64) -> String {
    format!("{:.1}", probability * 100.0)
}

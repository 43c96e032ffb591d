use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bound (inclusive) of the moderate band.
pub const MODERATE_THRESHOLD: f64 = 0.30;
/// Lower bound (inclusive) of the high band.
pub const HIGH_THRESHOLD: f64 = 0.70;

/// Discretized probability category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskBand {
    Low,
    Moderate,
    High,
}

impl RiskBand {
    /// Bands are closed below and open above: 0.30 is moderate, 0.70 is high.
    pub fn from_probability(probability: f64) -> Self {
        if probability >= HIGH_THRESHOLD {
            RiskBand::High
        } else if probability >= MODERATE_THRESHOLD {
            RiskBand::Moderate
        } else {
            RiskBand::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskBand::Low => "Low",
            RiskBand::Moderate => "Moderate",
            RiskBand::High => "High",
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_closed_on_the_lower_side() {
        assert_eq!(RiskBand::from_probability(0.0), RiskBand::Low);
        assert_eq!(RiskBand::from_probability(0.2999), RiskBand::Low);
        assert_eq!(RiskBand::from_probability(0.30), RiskBand::Moderate);
        assert_eq!(RiskBand::from_probability(0.5), RiskBand::Moderate);
        assert_eq!(RiskBand::from_probability(0.6999), RiskBand::Moderate);
        assert_eq!(RiskBand::from_probability(0.70), RiskBand::High);
        assert_eq!(RiskBand::from_probability(1.0), RiskBand::High);
    }

    #[test]
    fn neighbours_of_the_thresholds() {
        let below_moderate = f64::from_bits(MODERATE_THRESHOLD.to_bits() - 1);
        let below_high = f64::from_bits(HIGH_THRESHOLD.to_bits() - 1);
        assert_eq!(RiskBand::from_probability(below_moderate), RiskBand::Low);
        assert_eq!(RiskBand::from_probability(below_high), RiskBand::Moderate);
    }

    #[test]
    fn bands_are_ordered_by_severity() {
        assert!(RiskBand::Low < RiskBand::Moderate);
        assert!(RiskBand::Moderate < RiskBand::High);
        assert_eq!(RiskBand::High.to_string(), "High");
    }
}

//! Model versions and per-feature form metadata

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic version of a published coefficient set
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModelVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl ModelVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for ModelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for ModelVersion {
    type Err = String;

    /// Accepts `1`, `1.2` or `1.2.3`; omitted parts are zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('v').unwrap_or(s);
        let parts: Vec<&str> = s.split('.').collect();
        if parts.is_empty() || parts.len() > 3 || parts.iter().any(|p| p.is_empty()) {
            return Err(format!("invalid model version '{s}'"));
        }
        let mut nums = [0u32; 3];
        for (slot, part) in nums.iter_mut().zip(parts.iter()) {
            *slot = part
                .parse()
                .map_err(|_| format!("invalid model version '{s}'"))?;
        }
        Ok(Self::new(nums[0], nums[1], nums[2]))
    }
}

impl TryFrom<String> for ModelVersion {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ModelVersion> for String {
    fn from(v: ModelVersion) -> Self {
        v.to_string()
    }
}

/// How a feature is entered on the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureKind {
    /// Measured value bounded by a documented clinical range (inclusive).
    Continuous { min: f64, max: f64, unit: String },
    /// Finding encoded 1 for presence, 0 for absence.
    Binary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub key: String,
    #[serde(flatten)]
    pub kind: FeatureKind,
    /// Value used when the form leaves the field untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<f64>,
}

impl FeatureSpec {
    pub fn continuous(key: &str, min: f64, max: f64, unit: &str) -> Self {
        Self {
            key: key.to_string(),
            kind: FeatureKind::Continuous {
                min,
                max,
                unit: unit.to_string(),
            },
            default: None,
        }
    }

    /// Binary fields default to absent, like an untouched yes/no selector.
    pub fn binary(key: &str) -> Self {
        Self {
            key: key.to_string(),
            kind: FeatureKind::Binary,
            default: Some(0.0),
        }
    }

    pub fn with_default(mut self, value: f64) -> Self {
        self.default = Some(value);
        self
    }

    pub fn is_binary(&self) -> bool {
        matches!(self.kind, FeatureKind::Binary)
    }

    /// Whether `value` is acceptable for this feature.
    pub fn accepts(&self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        match &self.kind {
            FeatureKind::Continuous { min, max, .. } => (*min..=*max).contains(&value),
            FeatureKind::Binary => value == 0.0 || value == 1.0,
        }
    }

    pub fn unit(&self) -> Option<&str> {
        match &self.kind {
            FeatureKind::Continuous { unit, .. } if !unit.is_empty() => Some(unit.as_str()),
            _ => None,
        }
    }
}

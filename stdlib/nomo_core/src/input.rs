use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named feature values for a single scoring request.
///
/// Binary findings are stored as `1.0` (present) or `0.0` (absent).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputVector {
    values: BTreeMap<String, f64>,
}

impl InputVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, feature: impl Into<String>, value: f64) -> Option<f64> {
        self.values.insert(feature.into(), value)
    }

    /// Encodes a yes/no finding as 1/0.
    pub fn set_flag(&mut self, feature: impl Into<String>, present: bool) -> Option<f64> {
        self.insert(feature, if present { 1.0 } else { 0.0 })
    }

    pub fn with(mut self, feature: impl Into<String>, value: f64) -> Self {
        self.insert(feature, value);
        self
    }

    pub fn get(&self, feature: &str) -> Option<f64> {
        self.values.get(feature).copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for InputVector {
    fn from_iter<T: IntoIterator<Item = (K, f64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

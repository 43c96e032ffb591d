//! Shared fixtures for the workspace integration tests.

use nomo_models::ModelRegistry;

/// Field answers for the four-parameter reference patient.
pub fn tidal_reference_answers() -> Vec<(String, String)> {
    pairs(&[("FeNO", "20"), ("RR", "25"), ("PTEF", "150"), ("Wheeze", "yes")])
}

/// Field answers for the seven-parameter reference patient.
pub fn clinical_reference_answers() -> Vec<(String, String)> {
    pairs(&[
        ("FeNO", "25"),
        ("Age", "34"),
        ("TPTEF_TE", "23"),
        ("Wheeze", "no"),
        ("FamilyHistory", "no"),
        ("Rhinitis", "no"),
        ("Allergy", "no"),
    ])
}

pub fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn builtin_registry() -> ModelRegistry {
    ModelRegistry::with_builtin().expect("built-in models are valid")
}

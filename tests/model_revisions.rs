use nomo::{evaluate, load_registry, AppError};
use nomo_core::score;
use nomo_models::{ModelVersion, RegistryError};
use std::fs;
use std::sync::Arc;
use std::thread;
use tests::{builtin_registry, clinical_reference_answers, pairs, tidal_reference_answers};

const THREE_PARAMETER_REVISION: &str = r#"[{
    "id": "ahr-screen",
    "version": "0.9.0",
    "title": "Screening nomogram",
    "model": {"intercept": -4.0, "weights": {"FeNO": 0.05, "Wheeze": 1.2, "Rhinitis": 0.6}},
    "features": [
        {"key": "FeNO", "kind": "continuous", "min": 0, "max": 200, "unit": "ppb"},
        {"key": "Wheeze", "kind": "binary", "default": 0},
        {"key": "Rhinitis", "kind": "binary", "default": 0}
    ]
}]"#;

#[test]
fn extra_models_load_from_a_definitions_file() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("models.json");
    fs::write(&path, THREE_PARAMETER_REVISION).unwrap();

    let registry = load_registry(Some(path.as_path())).unwrap();
    assert_eq!(registry.list().len(), 3);

    let report = evaluate(&registry, "ahr-screen", None, &pairs(&[("FeNO", "40")])).unwrap();
    // -4 + 0.05 * 40 = -2.0
    assert!((report.explanation.result.logit + 2.0).abs() < 1e-9);
    assert_eq!(report.view.probability_percent, "11.9");
}

#[test]
fn duplicate_versions_in_a_definitions_file_fail_loading() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("models.json");
    let clash = THREE_PARAMETER_REVISION
        .replace("ahr-screen", "ahr-tidal")
        .replace("0.9.0", "1.0.0");
    fs::write(&path, clash).unwrap();

    assert!(matches!(
        load_registry(Some(path.as_path())),
        Err(RegistryError::ModelAlreadyExists(_))
    ));
}

#[test]
fn pinned_and_latest_selection() {
    let registry = builtin_registry();
    let newer = THREE_PARAMETER_REVISION
        .replace("ahr-screen", "ahr-tidal")
        .replace("0.9.0", "1.1.0")
        .replace(
            r#""weights": {"FeNO": 0.05, "Wheeze": 1.2, "Rhinitis": 0.6}"#,
            r#""weights": {"FeNO": 0.05, "Wheeze": 1.2}"#,
        )
        .replace(
            r#",
        {"key": "Rhinitis", "kind": "binary", "default": 0}"#,
            "",
        );
    registry.load_json_str(&newer).unwrap();

    let latest = registry.resolve("ahr-tidal").unwrap();
    assert_eq!(latest.version, ModelVersion::new(1, 1, 0));

    // Reference answers name RR and PTEF, which the newer revision dropped.
    let err = evaluate(&registry, "ahr-tidal", None, &tidal_reference_answers()).unwrap_err();
    assert!(matches!(err, AppError::Collect(_)));

    let pinned = evaluate(&registry, "ahr-tidal@1.0.0", None, &tidal_reference_answers()).unwrap();
    assert_eq!(pinned.view.probability_percent, "3.7");
}

#[test]
fn concurrent_requests_share_one_model() {
    let registry = builtin_registry();
    let def = registry.resolve("ahr-clinical").unwrap();
    let expected = evaluate(&registry, "ahr-clinical", None, &clinical_reference_answers())
        .unwrap()
        .inputs;
    let expected = Arc::new(expected);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let def = Arc::clone(&def);
            let inputs = Arc::clone(&expected);
            thread::spawn(move || score(&def.model, &inputs).unwrap())
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for r in &results {
        assert_eq!(r.probability.to_bits(), results[0].probability.to_bits());
        assert_eq!(r.risk_band, results[0].risk_band);
    }
}

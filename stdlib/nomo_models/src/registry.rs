//! Thread-safe model registry with versioning support

use log::{debug, info};
use nomo_core::ModelError;
use parking_lot::RwLock;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::builtin::builtin_models;
use crate::definition::ModelDefinition;
use crate::metadata::ModelVersion;

/// Errors that can occur during registry operations
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Model not found: {0}")]
    ModelNotFound(String),
    #[error("Model already exists: {0}")]
    ModelAlreadyExists(String),
    #[error("Invalid model definition '{key}': {reason}")]
    InvalidDefinition { key: String, reason: String },
    #[error("Invalid model selector '{0}'")]
    InvalidSelector(String),
    #[error("Invalid coefficients: {0}")]
    Model(#[from] ModelError),
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed model JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DefinitionFile {
    Many(Vec<ModelDefinition>),
    One(Box<ModelDefinition>),
}

type VersionTable = BTreeMap<ModelVersion, Arc<ModelDefinition>>;

/// Registry of model definitions keyed by id, then version.
///
/// Definitions are immutable once registered and handed out as `Arc`s, so
/// callers can score without holding the lock.
pub struct ModelRegistry {
    models: RwLock<BTreeMap<String, VersionTable>>,
}

impl ModelRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            models: RwLock::new(BTreeMap::new()),
        }
    }

    /// Registry pre-loaded with the shipped coefficient sets
    pub fn with_builtin() -> Result<Self, RegistryError> {
        let registry = Self::new();
        for def in builtin_models()? {
            registry.register(def)?;
        }
        Ok(registry)
    }

    /// Validate and register a definition
    pub fn register(
        &self,
        definition: ModelDefinition,
    ) -> Result<Arc<ModelDefinition>, RegistryError> {
        validate(&definition)?;
        let mut models = self.models.write();
        if contains(&models, &definition) {
            return Err(RegistryError::ModelAlreadyExists(definition.key()));
        }
        Ok(insert(&mut models, definition))
    }

    /// Look up a model; without a version the newest one is returned
    pub fn get(
        &self,
        id: &str,
        version: Option<&ModelVersion>,
    ) -> Result<Arc<ModelDefinition>, RegistryError> {
        let models = self.models.read();
        let versions = models
            .get(id)
            .ok_or_else(|| RegistryError::ModelNotFound(id.to_string()))?;
        let found = match version {
            Some(v) => versions.get(v),
            None => versions.values().next_back(),
        };
        found.cloned().ok_or_else(|| match version {
            Some(v) => RegistryError::ModelNotFound(format!("{id}@{v}")),
            None => RegistryError::ModelNotFound(id.to_string()),
        })
    }

    /// Resolve a selector of the form `id` or `id@version`
    pub fn resolve(&self, selector: &str) -> Result<Arc<ModelDefinition>, RegistryError> {
        let selector = selector.trim();
        let (id, version) = match selector.split_once('@') {
            Some((id, v)) => {
                let version = v
                    .parse::<ModelVersion>()
                    .map_err(|_| RegistryError::InvalidSelector(selector.to_string()))?;
                (id, Some(version))
            }
            None => (selector, None),
        };
        if id.is_empty() {
            return Err(RegistryError::InvalidSelector(selector.to_string()));
        }
        let def = self.get(id, version.as_ref())?;
        debug!("resolved '{selector}' to {}", def.key());
        Ok(def)
    }

    /// All definitions ordered by id, then version
    pub fn list(&self) -> Vec<Arc<ModelDefinition>> {
        let models = self.models.read();
        models
            .values()
            .flat_map(|versions| versions.values().cloned())
            .collect()
    }

    /// Remove one version of a model
    pub fn unregister(&self, id: &str, version: &ModelVersion) -> Result<(), RegistryError> {
        let mut models = self.models.write();
        let versions = models
            .get_mut(id)
            .ok_or_else(|| RegistryError::ModelNotFound(id.to_string()))?;
        versions
            .remove(version)
            .ok_or_else(|| RegistryError::ModelNotFound(format!("{id}@{version}")))?;
        if versions.is_empty() {
            models.remove(id);
        }
        info!("unregistered model {id}@{version}");
        Ok(())
    }

    /// Register every definition in a JSON document (one object or an array).
    /// Returns the number of definitions added.
    ///
    /// The document is loaded as a whole: if any definition is invalid or
    /// clashes with a registered or sibling version, nothing is registered.
    pub fn load_json_str(&self, text: &str) -> Result<usize, RegistryError> {
        let defs = match serde_json::from_str::<DefinitionFile>(text)? {
            DefinitionFile::Many(defs) => defs,
            DefinitionFile::One(def) => vec![*def],
        };
        for def in &defs {
            validate(def)?;
        }

        let mut models = self.models.write();
        let mut batch = BTreeSet::new();
        if let Some(clash) = defs
            .iter()
            .find(|def| contains(&models, def) || !batch.insert(def.key()))
        {
            return Err(RegistryError::ModelAlreadyExists(clash.key()));
        }
        let count = defs.len();
        for def in defs {
            insert(&mut models, def);
        }
        Ok(count)
    }

    pub fn load_json(&self, path: impl AsRef<Path>) -> Result<usize, RegistryError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let count = self.load_json_str(&text)?;
        info!("loaded {count} model definition(s) from {}", path.display());
        Ok(count)
    }
}

fn validate(definition: &ModelDefinition) -> Result<(), RegistryError> {
    definition
        .validate()
        .map_err(|reason| RegistryError::InvalidDefinition {
            key: definition.key(),
            reason,
        })
}

fn contains(models: &BTreeMap<String, VersionTable>, definition: &ModelDefinition) -> bool {
    models
        .get(&definition.id)
        .is_some_and(|versions| versions.contains_key(&definition.version))
}

fn insert(
    models: &mut BTreeMap<String, VersionTable>,
    definition: ModelDefinition,
) -> Arc<ModelDefinition> {
    let definition = Arc::new(definition);
    models
        .entry(definition.id.clone())
        .or_default()
        .insert(definition.version, Arc::clone(&definition));
    info!(
        "registered model {} ({} features)",
        definition.key(),
        definition.model.len()
    );
    definition
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::FeatureSpec;
    use nomo_core::ScoringModel;

    fn demo(id: &str, version: ModelVersion, intercept: f64) -> ModelDefinition {
        ModelDefinition {
            id: id.into(),
            version,
            title: "Demo".into(),
            titles: BTreeMap::new(),
            citation: None,
            model: ScoringModel::new(intercept, [("FeNO", 0.05)]).unwrap(),
            features: vec![FeatureSpec::continuous("FeNO", 0.0, 200.0, "ppb")],
        }
    }

    #[test]
    fn registry_register_and_get() {
        let registry = ModelRegistry::new();
        registry
            .register(demo("model-1", ModelVersion::new(1, 0, 0), 0.0))
            .unwrap();

        let def = registry
            .get("model-1", Some(&ModelVersion::new(1, 0, 0)))
            .unwrap();
        assert_eq!(def.id, "model-1");
        assert!(matches!(
            registry.get("model-2", None),
            Err(RegistryError::ModelNotFound(_))
        ));
    }

    #[test]
    fn registry_duplicate_registration_fails() {
        let registry = ModelRegistry::new();
        let v1 = ModelVersion::new(1, 0, 0);
        registry.register(demo("model-1", v1, 0.0)).unwrap();
        let result = registry.register(demo("model-1", v1, 1.0));
        assert!(matches!(
            result.unwrap_err(),
            RegistryError::ModelAlreadyExists(_)
        ));
    }

    #[test]
    fn registry_latest_version_wins_without_selector_version() {
        let registry = ModelRegistry::new();
        registry
            .register(demo("model-1", ModelVersion::new(1, 2, 0), 0.0))
            .unwrap();
        registry
            .register(demo("model-1", ModelVersion::new(1, 10, 0), 1.0))
            .unwrap();
        registry
            .register(demo("model-1", ModelVersion::new(1, 9, 3), 2.0))
            .unwrap();

        let latest = registry.resolve("model-1").unwrap();
        assert_eq!(latest.version, ModelVersion::new(1, 10, 0));

        let pinned = registry.resolve("model-1@1.2").unwrap();
        assert_eq!(pinned.model.intercept(), 0.0);

        assert!(matches!(
            registry.resolve("model-1@2.0.0"),
            Err(RegistryError::ModelNotFound(_))
        ));
        assert!(matches!(
            registry.resolve("model-1@latest"),
            Err(RegistryError::InvalidSelector(_))
        ));
        assert!(matches!(
            registry.resolve("@1.0"),
            Err(RegistryError::InvalidSelector(_))
        ));
    }

    #[test]
    fn registry_rejects_invalid_definition() {
        let registry = ModelRegistry::new();
        let mut def = demo("model-1", ModelVersion::new(1, 0, 0), 0.0);
        def.features.clear();
        assert!(matches!(
            registry.register(def),
            Err(RegistryError::InvalidDefinition { .. })
        ));
        assert!(registry.list().is_empty());
    }

    #[test]
    fn registry_unregister() {
        let registry = ModelRegistry::with_builtin().unwrap();
        assert_eq!(registry.list().len(), 2);

        registry
            .unregister("ahr-tidal", &ModelVersion::new(1, 0, 0))
            .unwrap();
        assert_eq!(registry.list().len(), 1);
        assert!(registry.resolve("ahr-tidal").is_err());
        assert!(registry
            .unregister("ahr-tidal", &ModelVersion::new(1, 0, 0))
            .is_err());
    }

    #[test]
    fn concurrent_lookups_share_definitions() {
        let registry = Arc::new(ModelRegistry::with_builtin().unwrap());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.resolve("ahr-clinical").unwrap().model.len())
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), 7);
        }
    }
}

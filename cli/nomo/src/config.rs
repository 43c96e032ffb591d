//! Deployment configuration: which model is active, which language the
//! surface speaks, and where extra model definitions live.
//!
//! Every setting can come from a flag or an environment variable
//! (`NOMO_MODEL`, `NOMO_LANG`, `NOMO_MODELS_JSON`); flags win.

use nomo_display::Locale;
use nomo_models::{ModelRegistry, RegistryError, DEFAULT_MODEL_ID};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// `id` or `id@version`.
    pub model: String,
    pub locale: Locale,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL_ID.to_string(),
            locale: Locale::English,
        }
    }
}

/// Built-in models plus any definitions found in `models_json`.
pub fn load_registry(models_json: Option<&Path>) -> Result<ModelRegistry, RegistryError> {
    let registry = ModelRegistry::with_builtin()?;
    if let Some(path) = models_json {
        registry.load_json(path)?;
    }
    Ok(registry)
}

//! Versioned registry of published nomogram scoring models.
//!
//! Each [`ModelDefinition`] pairs a [`nomo_core::ScoringModel`] with the
//! metadata a form needs to collect its inputs: feature kinds, clinical
//! ranges and pre-filled defaults. Coefficients encode a published model, so
//! any change to them is a new [`ModelVersion`].

pub mod builtin;
pub mod definition;
pub mod metadata;
pub mod registry;

pub use builtin::{ahr_clinical, ahr_tidal, builtin_models, DEFAULT_MODEL_ID};
pub use definition::ModelDefinition;
pub use metadata::{FeatureKind, FeatureSpec, ModelVersion};
pub use registry::{ModelRegistry, RegistryError};

//! Turbulence model registry.
//!
//! The registry is the single source of truth for which models exist and
//! which parameters each one exposes. Every downstream component reads the
//! parameter list from here; nothing branches on a model key.

mod builtin;
mod model;
mod parameter;

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use serde::Deserialize;

pub use self::model::TurbulenceModel;
pub use self::parameter::{ParameterRange, ParameterSpec, Quantity};
use crate::{Error, Result, TRACING_TARGET_REGISTRY};

static GLOBAL: LazyLock<ModelRegistry> = LazyLock::new(ModelRegistry::builtin);

/// Ordered catalogue of turbulence models.
///
/// Models are kept in registration order and handed out as shared [`Arc`]s,
/// so a registry can be cloned cheaply and read concurrently without locking.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: Vec<Arc<TurbulenceModel>>,
    index: HashMap<String, usize>,
}

/// Either a single model or a list of models, as accepted from JSON.
#[derive(Deserialize)]
#[serde(untagged)]
enum ModelDocument {
    Many(Vec<TurbulenceModel>),
    One(Box<TurbulenceModel>),
}

impl ModelRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in models.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for model in builtin::models() {
            registry.insert(model);
        }
        registry
    }

    /// Returns the process-wide registry of built-in models.
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Registers a model after validating it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidModel`] if the model fails validation or its key
    /// is already registered.
    pub fn register(&mut self, model: TurbulenceModel) -> Result<()> {
        model.validate()?;
        if self.contains(&model.key) {
            return Err(Error::invalid_model(&model.key, "model key is already registered"));
        }

        tracing::debug!(
            target: TRACING_TARGET_REGISTRY,
            model = %model.key,
            parameters = model.parameters.len(),
            "Registered turbulence model"
        );

        self.insert(model);
        Ok(())
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_model(mut self, model: TurbulenceModel) -> Result<Self> {
        self.register(model)?;
        Ok(self)
    }

    /// Registers every model in a JSON document.
    ///
    /// The document is either a single model object or an array of them.
    /// Nothing is registered unless every model in the document is valid.
    pub fn register_json(&mut self, json: &str) -> Result<usize> {
        let models = match serde_json::from_str::<ModelDocument>(json)? {
            ModelDocument::Many(models) => models,
            ModelDocument::One(model) => vec![*model],
        };

        let mut staged = self.clone();
        for model in &models {
            staged.register(model.clone())?;
        }
        *self = staged;

        tracing::info!(
            target: TRACING_TARGET_REGISTRY,
            added = models.len(),
            total = self.len(),
            "Extended model registry from JSON"
        );

        Ok(models.len())
    }

    /// Builder form of [`register_json`](Self::register_json).
    pub fn with_models_json(mut self, json: &str) -> Result<Self> {
        self.register_json(json)?;
        Ok(self)
    }

    /// Returns all models in registration order.
    pub fn list(&self) -> &[Arc<TurbulenceModel>] {
        &self.models
    }

    /// Returns all model keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(|m| m.key.as_str())
    }

    /// Returns the model registered under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownModel`] if no such model exists.
    pub fn get(&self, key: &str) -> Result<Arc<TurbulenceModel>> {
        self.index
            .get(key)
            .map(|&i| Arc::clone(&self.models[i]))
            .ok_or_else(|| Error::unknown_model(key))
    }

    /// Returns true if a model is registered under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the number of registered models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns true if no models are registered.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    fn insert(&mut self, model: TurbulenceModel) {
        self.index.insert(model.key.clone(), self.models.len());
        self.models.push(Arc::new(model));
    }
}

//! Turbulence model definition.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::ParameterSpec;
use crate::{Error, Result};

/// A turbulence closure with its tunable parameters.
///
/// The parameter list is ordered; recommendations are always reported in
/// this order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurbulenceModel {
    /// Unique registry key (e.g. `k_omega_sst`).
    pub key: String,
    /// Display name (e.g. `k-ω SST (Shear Stress Transport)`).
    pub name: String,
    /// What the model solves and how.
    #[serde(default)]
    pub description: String,
    /// Model family (e.g. `RANS`).
    #[serde(default)]
    pub category: String,
    /// Ordered parameter schema.
    pub parameters: Vec<ParameterSpec>,
    /// Flow regimes the model is suited for (e.g. `wall_bounded`).
    #[serde(default)]
    pub regimes: Vec<String>,
    /// Typical engineering applications.
    #[serde(default)]
    pub applications: Vec<String>,
    /// Known weaknesses.
    #[serde(default)]
    pub limitations: Vec<String>,
}

impl TurbulenceModel {
    /// Creates a model with no parameters.
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            description: String::new(),
            category: String::new(),
            parameters: Vec::new(),
            regimes: Vec::new(),
            applications: Vec::new(),
            limitations: Vec::new(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Appends a parameter to the schema.
    pub fn with_parameter(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Sets the applicable flow regimes.
    pub fn with_regimes<I, S>(mut self, regimes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regimes = regimes.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the typical applications.
    pub fn with_applications<I, S>(mut self, applications: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.applications = applications.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the known limitations.
    pub fn with_limitations<I, S>(mut self, limitations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.limitations = limitations.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the parameter with the given canonical name.
    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Returns the canonical parameter names in schema order.
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|p| p.name.as_str())
    }

    /// Checks the model invariants.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidModel`] if the key is empty, the schema has no
    /// parameters, a name, symbol or alias is shared by two parameters, or a
    /// parameter's range and default are inconsistent.
    pub fn validate(&self) -> Result<()> {
        if self.key.trim().is_empty() {
            return Err(Error::invalid_model("<empty>", "model key is empty"));
        }
        if self.parameters.is_empty() {
            return Err(Error::invalid_model(&self.key, "model has no parameters"));
        }

        let mut seen = HashSet::new();
        for parameter in &self.parameters {
            parameter
                .check()
                .map_err(|message| Error::invalid_model(&self.key, message))?;

            let names: HashSet<String> = std::iter::once(&parameter.name)
                .chain(std::iter::once(&parameter.symbol))
                .chain(&parameter.aliases)
                .map(|name| name.to_ascii_lowercase())
                .collect();
            for name in names {
                if !seen.insert(name.clone()) {
                    return Err(Error::invalid_model(
                        &self.key,
                        format!("parameter name `{name}` is used more than once"),
                    ));
                }
            }
        }

        Ok(())
    }
}

//! Parameter schema of a turbulence model.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Physical quantity a parameter represents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Quantity {
    /// Dimensionless closure coefficient.
    #[default]
    Dimensionless,
    Length,
    Time,
    Velocity,
    KinematicViscosity,
    Energy,
    Dissipation,
}

/// Closed numeric interval whose ends may be open-ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    /// Inclusive lower bound, `None` when unbounded below.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Inclusive upper bound, `None` when unbounded above.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl ParameterRange {
    /// Creates a range bounded on both ends.
    pub const fn new(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Creates a range bounded only from below.
    pub const fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    /// Creates a range bounded only from above.
    pub const fn at_most(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    /// Creates a range with no bounds.
    pub const fn unbounded() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    /// Returns true if `value` lies inside the range (bounds inclusive).
    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }

    /// Returns true if the bounds are finite and ordered.
    pub fn is_well_formed(&self) -> bool {
        let finite = self.min.is_none_or(f64::is_finite) && self.max.is_none_or(f64::is_finite);
        match (self.min, self.max) {
            (Some(min), Some(max)) => finite && min <= max,
            _ => finite,
        }
    }
}

impl fmt::Display for ParameterRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) => write!(f, "{min} to {max}"),
            (Some(min), None) => write!(f, ">= {min}"),
            (None, Some(max)) => write!(f, "<= {max}"),
            (None, None) => write!(f, "unbounded"),
        }
    }
}

/// Schema of a single tunable parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Canonical parameter name used in recommendations (e.g. `C1e`).
    pub name: String,
    /// Mathematical symbol (e.g. `C_1ε`).
    pub symbol: String,
    /// Short physical description.
    #[serde(default)]
    pub description: String,
    /// Physical quantity; every parameter is a float.
    #[serde(default)]
    pub quantity: Quantity,
    /// Valid range. Values outside are flagged, never clamped.
    #[serde(default)]
    pub range: ParameterRange,
    /// Commonly used sub-range; values outside it must be justified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typical: Option<ParameterRange>,
    /// Standard value from the model's reference calibration.
    #[serde(rename = "default", default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<f64>,
    /// Units, when not dimensionless.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    /// Alternative names a generator may use for this parameter.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl ParameterSpec {
    /// Creates a dimensionless parameter with the given standard value.
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, default_value: f64) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            description: String::new(),
            quantity: Quantity::Dimensionless,
            range: ParameterRange::unbounded(),
            typical: None,
            default_value: Some(default_value),
            units: None,
            aliases: Vec::new(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the valid range.
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = ParameterRange::new(min, max);
        self
    }

    /// Sets the typical range.
    pub fn with_typical(mut self, min: f64, max: f64) -> Self {
        self.typical = Some(ParameterRange::new(min, max));
        self
    }

    /// Adds alternative names.
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Returns true if `candidate` names this parameter.
    ///
    /// Matches the canonical name, the symbol or any alias, ignoring ASCII case.
    pub fn is_named(&self, candidate: &str) -> bool {
        let candidate = candidate.trim();
        std::iter::once(self.name.as_str())
            .chain(std::iter::once(self.symbol.as_str()))
            .chain(self.aliases.iter().map(String::as_str))
            .any(|name| name.eq_ignore_ascii_case(candidate))
    }

    /// Returns true if `value` lies in the valid range.
    pub fn accepts(&self, value: f64) -> bool {
        value.is_finite() && self.range.contains(value)
    }

    /// Returns true if `value` lies in the typical range (or no typical range is set).
    pub fn is_typical(&self, value: f64) -> bool {
        self.typical.is_none_or(|typical| typical.contains(value))
    }

    /// Checks the schema invariants, returning a description of the first violation.
    pub fn check(&self) -> std::result::Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("parameter name is empty".into());
        }
        if !self.range.is_well_formed() {
            return Err(format!("{}: malformed range {}", self.name, self.range));
        }
        if let Some(typical) = &self.typical
            && !typical.is_well_formed()
        {
            return Err(format!("{}: malformed typical range {typical}", self.name));
        }
        if let Some(default_value) = self.default_value
            && !self.range.contains(default_value)
        {
            return Err(format!(
                "{}: default {default_value} outside range {}",
                self.name, self.range
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_contains_inclusive_bounds() {
        let range = ParameterRange::new(0.05, 0.15);
        assert!(range.contains(0.05));
        assert!(range.contains(0.15));
        assert!(!range.contains(0.151));
        assert!(ParameterRange::at_least(1.0).contains(1e9));
        assert!(ParameterRange::unbounded().contains(-1e9));
    }

    #[test]
    fn range_display() {
        assert_eq!(ParameterRange::new(1.2, 1.6).to_string(), "1.2 to 1.6");
        assert_eq!(ParameterRange::at_least(0.0).to_string(), ">= 0");
        assert_eq!(ParameterRange::unbounded().to_string(), "unbounded");
    }

    #[test]
    fn default_outside_range_is_rejected() {
        let spec = ParameterSpec::new("Cmu", "C_μ", 0.2).with_range(0.05, 0.15);
        assert!(spec.check().is_err());

        let spec = ParameterSpec::new("Cmu", "C_μ", 0.09).with_range(0.05, 0.15);
        assert!(spec.check().is_ok());
    }

    #[test]
    fn inverted_range_is_rejected() {
        let spec = ParameterSpec::new("x", "x", 1.0).with_range(2.0, 0.0);
        assert!(spec.check().is_err());
    }

    #[test]
    fn name_matching_uses_aliases_and_ignores_case() {
        let spec = ParameterSpec::new("C1e", "C_1ε", 1.44).with_aliases(["C1epsilon"]);
        assert!(spec.is_named("C1e"));
        assert!(spec.is_named("c1epsilon"));
        assert!(spec.is_named("C_1ε"));
        assert!(!spec.is_named("C2e"));
    }

    #[test]
    fn non_finite_values_are_not_accepted() {
        let spec = ParameterSpec::new("x", "x", 1.0);
        assert!(!spec.accepts(f64::NAN));
        assert!(!spec.accepts(f64::INFINITY));
        assert!(spec.accepts(1e6));
    }

    #[test]
    fn deserializes_with_default_field_name() {
        let spec: ParameterSpec = serde_json::from_str(
            r#"{"name":"Cmu","symbol":"C_mu","default":0.09,"range":{"min":0.05,"max":0.15}}"#,
        )
        .unwrap();
        assert_eq!(spec.default_value, Some(0.09));
        assert_eq!(spec.quantity, Quantity::Dimensionless);
        assert!(spec.check().is_ok());
    }
}

//! Prompt configuration.

#[cfg(feature = "config")]
use clap::Args;
use eddy_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the [`PromptBuilder`].
///
/// [`PromptBuilder`]: crate::prompt::PromptBuilder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct PromptConfig {
    /// Character budget for retrieved passages in the user prompt
    #[cfg_attr(
        feature = "config",
        arg(
            long = "prompt-max-context-chars",
            env = "PROMPT_MAX_CONTEXT_CHARS",
            default_value = "4000"
        )
    )]
    pub max_context_chars: usize,

    /// Sampling temperature for the generative model
    #[cfg_attr(
        feature = "config",
        arg(long = "prompt-temperature", env = "PROMPT_TEMPERATURE", default_value = "0.1")
    )]
    pub temperature: f64,

    /// Maximum tokens in the generated response
    #[cfg_attr(
        feature = "config",
        arg(long = "prompt-max-tokens", env = "PROMPT_MAX_TOKENS", default_value = "2000")
    )]
    pub max_tokens: u64,
}

impl PromptConfig {
    /// Sets the character budget for retrieved passages.
    pub fn with_max_context_chars(mut self, max_context_chars: usize) -> Self {
        self.max_context_chars = max_context_chars;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_context_chars == 0 {
            return Err(Error::config("prompt context budget must be non-zero"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::config(format!(
                "temperature {} outside 0.0 to 2.0",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(Error::config("max tokens must be non-zero"));
        }
        Ok(())
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            max_context_chars: 4000,
            temperature: 0.1,
            max_tokens: 2000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(PromptConfig::default().validate().is_ok());
    }

    #[test]
    fn out_of_range_temperature_is_rejected() {
        let config = PromptConfig {
            temperature: 3.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}

//! Shared credential types for AI providers.

use eddy_core::{Error, Result};
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

/// API key credentials for AI providers.
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiKeyCredentials {
    /// API key.
    pub api_key: String,
}

impl ApiKeyCredentials {
    /// Creates credentials from an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

impl std::fmt::Debug for ApiKeyCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyCredentials")
            .field("api_key", &"***")
            .finish()
    }
}

/// Credentials for every supported AI provider.
#[derive(Debug, Clone, Serialize, Deserialize, IntoStaticStr)]
#[serde(tag = "provider", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Credentials {
    /// OpenAI credentials (supports completion and embedding).
    #[serde(rename = "openai")]
    #[strum(serialize = "openai")]
    OpenAi(ApiKeyCredentials),
    /// Anthropic credentials (completion only).
    Anthropic(ApiKeyCredentials),
    /// Cohere credentials (embedding only here).
    Cohere(ApiKeyCredentials),
}

impl Credentials {
    /// Returns the provider name as a string.
    pub fn provider(&self) -> &'static str {
        self.into()
    }

    /// Returns the API key.
    pub(crate) fn api_key(&self) -> &str {
        match self {
            Self::OpenAi(c) | Self::Anthropic(c) | Self::Cohere(c) => &c.api_key,
        }
    }

    /// Returns an error if the API key is blank.
    pub(crate) fn require_api_key(&self) -> Result<()> {
        if self.api_key().trim().is_empty() {
            return Err(Error::config(format!("{} API key is empty", self.provider())));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_masks_api_key() {
        let credentials = Credentials::OpenAi(ApiKeyCredentials::new("sk-secret"));
        assert!(!format!("{credentials:?}").contains("sk-secret"));
        assert_eq!(credentials.provider(), "openai");
    }

    #[test]
    fn blank_key_is_rejected() {
        let credentials = Credentials::Anthropic(ApiKeyCredentials::new("  "));
        assert!(matches!(credentials.require_api_key(), Err(Error::Config(_))));
    }
}

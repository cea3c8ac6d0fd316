//! Type-safe completion model references.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Reference to a completion/chat model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", content = "model", rename_all = "snake_case")]
pub enum CompletionModel {
    /// OpenAI completion models.
    #[serde(rename = "openai")]
    OpenAi(OpenAiCompletionModel),
    /// Anthropic models.
    Anthropic(AnthropicModel),
}

/// OpenAI completion models.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum OpenAiCompletionModel {
    /// GPT-4o (multimodal flagship)
    #[default]
    #[strum(serialize = "gpt-4o")]
    #[serde(rename = "gpt-4o")]
    Gpt4o,
    /// GPT-4o mini (fast, affordable)
    #[strum(serialize = "gpt-4o-mini")]
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,
    /// GPT-4 Turbo
    #[strum(serialize = "gpt-4-turbo")]
    #[serde(rename = "gpt-4-turbo")]
    Gpt4Turbo,
}

/// Anthropic models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AnthropicModel {
    /// Claude Opus 4 (most capable)
    #[strum(serialize = "claude-opus-4-20250514")]
    #[serde(rename = "claude-opus-4-20250514")]
    ClaudeOpus4,
    /// Claude Sonnet 4 (balanced)
    #[strum(serialize = "claude-sonnet-4-20250514")]
    #[serde(rename = "claude-sonnet-4-20250514")]
    ClaudeSonnet4,
    /// Claude Haiku 3.5 (fast)
    #[strum(serialize = "claude-3-5-haiku-20241022")]
    #[serde(rename = "claude-3-5-haiku-20241022")]
    ClaudeHaiku35,
}

impl CompletionModel {
    /// Returns the model identifier string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::OpenAi(m) => m.as_ref(),
            Self::Anthropic(m) => m.as_ref(),
        }
    }

    /// Parses a model identifier, inferring the provider from it.
    pub fn parse(name: &str) -> Option<Self> {
        if let Ok(m) = name.parse::<OpenAiCompletionModel>() {
            return Some(Self::OpenAi(m));
        }
        name.parse::<AnthropicModel>().ok().map(Self::Anthropic)
    }
}

impl Default for CompletionModel {
    fn default() -> Self {
        Self::OpenAi(OpenAiCompletionModel::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_gpt_4o() {
        assert_eq!(CompletionModel::default().as_str(), "gpt-4o");
    }

    #[test]
    fn parse_infers_provider() {
        assert_eq!(
            CompletionModel::parse("claude-sonnet-4-20250514"),
            Some(CompletionModel::Anthropic(AnthropicModel::ClaudeSonnet4))
        );
        assert_eq!(
            CompletionModel::parse("gpt-4o-mini"),
            Some(CompletionModel::OpenAi(OpenAiCompletionModel::Gpt4oMini))
        );
        assert_eq!(CompletionModel::parse("davinci"), None);
    }

    #[test]
    fn serializes_with_provider_tag() {
        let json = serde_json::to_value(CompletionModel::default()).unwrap();
        assert_eq!(json, serde_json::json!({"provider": "openai", "model": "gpt-4o"}));
    }
}

//! Type-safe embedding model references.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Reference to an embedding model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", content = "model", rename_all = "snake_case")]
pub enum EmbeddingModel {
    /// OpenAI embedding models.
    #[serde(rename = "openai")]
    OpenAi(OpenAiEmbeddingModel),
    /// Cohere embedding models.
    Cohere(CohereEmbeddingModel),
}

/// OpenAI embedding models.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum OpenAiEmbeddingModel {
    /// text-embedding-3-small (1536 dimensions)
    #[default]
    #[strum(serialize = "text-embedding-3-small")]
    #[serde(rename = "text-embedding-3-small")]
    TextEmbedding3Small,
    /// text-embedding-3-large (3072 dimensions)
    #[strum(serialize = "text-embedding-3-large")]
    #[serde(rename = "text-embedding-3-large")]
    TextEmbedding3Large,
    /// text-embedding-ada-002 (legacy, 1536 dimensions)
    #[strum(serialize = "text-embedding-ada-002")]
    #[serde(rename = "text-embedding-ada-002")]
    TextEmbeddingAda002,
}

impl OpenAiEmbeddingModel {
    pub fn dimensions(&self) -> usize {
        match self {
            Self::TextEmbedding3Small => 1536,
            Self::TextEmbedding3Large => 3072,
            Self::TextEmbeddingAda002 => 1536,
        }
    }
}

/// Cohere embedding models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString)]
pub enum CohereEmbeddingModel {
    /// embed-english-v3.0 (1024 dimensions)
    #[strum(serialize = "embed-english-v3.0")]
    #[serde(rename = "embed-english-v3.0")]
    EmbedEnglishV3,
    /// embed-multilingual-v3.0 (1024 dimensions)
    #[strum(serialize = "embed-multilingual-v3.0")]
    #[serde(rename = "embed-multilingual-v3.0")]
    EmbedMultilingualV3,
    /// embed-english-light-v3.0 (384 dimensions)
    #[strum(serialize = "embed-english-light-v3.0")]
    #[serde(rename = "embed-english-light-v3.0")]
    EmbedEnglishLightV3,
}

impl CohereEmbeddingModel {
    pub fn dimensions(&self) -> usize {
        match self {
            Self::EmbedEnglishV3 | Self::EmbedMultilingualV3 => 1024,
            Self::EmbedEnglishLightV3 => 384,
        }
    }
}

impl EmbeddingModel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::OpenAi(m) => m.as_ref(),
            Self::Cohere(m) => m.as_ref(),
        }
    }

    pub fn dimensions(&self) -> usize {
        match self {
            Self::OpenAi(m) => m.dimensions(),
            Self::Cohere(m) => m.dimensions(),
        }
    }

    /// Parses a model identifier, inferring the provider from it.
    pub fn parse(name: &str) -> Option<Self> {
        if let Ok(m) = name.parse::<OpenAiEmbeddingModel>() {
            return Some(Self::OpenAi(m));
        }
        name.parse::<CohereEmbeddingModel>().ok().map(Self::Cohere)
    }
}

impl Default for EmbeddingModel {
    fn default() -> Self {
        Self::OpenAi(OpenAiEmbeddingModel::default())
    }
}

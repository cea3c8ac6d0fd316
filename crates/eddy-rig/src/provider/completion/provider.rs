//! Completion provider abstraction.

use std::sync::Arc;

use async_trait::async_trait;
use eddy_core::{Error, GenerationRequest, GenerativeModel, Result};
use rig::completion::{AssistantContent, CompletionError, CompletionModel as RigCompletionModel};
use rig::one_or_many::OneOrMany;
use rig::prelude::CompletionClient;
use rig::providers::{anthropic, openai};
use serde_json::{Value, json};

use super::model::{AnthropicModel, CompletionModel, OpenAiCompletionModel};
use crate::provider::{Credentials, TRACING_TARGET};

/// Completion provider that wraps different rig completion model implementations.
///
/// This is a cheaply cloneable wrapper around an `Arc<CompletionService>`.
#[derive(Clone)]
pub struct CompletionProvider(Arc<CompletionService>);

enum CompletionService {
    OpenAi {
        model: openai::CompletionModel,
        model_name: String,
    },
    Anthropic {
        model: anthropic::completion::CompletionModel,
        model_name: String,
    },
}

impl CompletionProvider {
    /// Creates a provider for `model` authenticated with `credentials`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the credentials belong to a different
    /// provider or the API key is blank.
    pub fn new(model: CompletionModel, credentials: Credentials) -> Result<Self> {
        credentials.require_api_key()?;

        match (credentials, model) {
            (Credentials::OpenAi(c), CompletionModel::OpenAi(m)) => Self::openai(&c.api_key, m),
            (Credentials::Anthropic(c), CompletionModel::Anthropic(m)) => {
                Self::anthropic(&c.api_key, m)
            }
            (credentials, model) => Err(Error::config(format!(
                "{} credentials cannot be used with model {}",
                credentials.provider(),
                model.as_str()
            ))),
        }
    }

    /// Creates an OpenAI completion provider with a specific model.
    pub fn openai(api_key: &str, model: OpenAiCompletionModel) -> Result<Self> {
        let client = openai::Client::new(api_key)
            .map_err(|e| Error::config(format!("openai: {e}")))?
            .completions_api();
        Ok(Self(Arc::new(CompletionService::OpenAi {
            model: client.completion_model(model.as_ref()),
            model_name: model.as_ref().to_string(),
        })))
    }

    /// Creates an Anthropic completion provider with a specific model.
    pub fn anthropic(api_key: &str, model: AnthropicModel) -> Result<Self> {
        let client = anthropic::Client::new(api_key)
            .map_err(|e| Error::config(format!("anthropic: {e}")))?;
        Ok(Self(Arc::new(CompletionService::Anthropic {
            model: client.completion_model(model.as_ref()),
            model_name: model.as_ref().to_string(),
        })))
    }

    /// Returns the provider name.
    pub fn provider_name(&self) -> &'static str {
        match self.0.as_ref() {
            CompletionService::OpenAi { .. } => "openai",
            CompletionService::Anthropic { .. } => "anthropic",
        }
    }
}

#[async_trait]
impl GenerativeModel for CompletionProvider {
    fn model_name(&self) -> &str {
        match self.0.as_ref() {
            CompletionService::OpenAi { model_name, .. } => model_name,
            CompletionService::Anthropic { model_name, .. } => model_name,
        }
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        tracing::debug!(
            target: TRACING_TARGET,
            provider = self.provider_name(),
            model = self.model_name(),
            prompt_chars = request.user_prompt.len(),
            "Sending completion request"
        );

        let provider = self.provider_name();
        let map_err = |e: CompletionError| {
            Error::generation_service(format!("{provider} completion failed: {e}"))
        };

        let text = match self.0.as_ref() {
            CompletionService::OpenAi { model, .. } => model
                .completion_request(request.user_prompt.as_str())
                .preamble(request.system_prompt.clone())
                .temperature(request.temperature)
                .max_tokens(request.max_tokens)
                .additional_params(openai_response_format(request))
                .send()
                .await
                .map(|r| extract_text_content(&r.choice))
                .map_err(map_err)?,
            CompletionService::Anthropic { model, .. } => model
                .completion_request(request.user_prompt.as_str())
                .preamble(preamble_with_schema(request))
                .temperature(request.temperature)
                .max_tokens(request.max_tokens)
                .send()
                .await
                .map(|r| extract_text_content(&r.choice))
                .map_err(map_err)?,
        };

        Ok(text)
    }
}

/// Name the response schema is registered under with OpenAI.
const RESPONSE_SCHEMA_NAME: &str = "turbulence_parameters";

/// OpenAI structured-output parameters for `request`.
///
/// The schema is advisory (`strict: false`); the generator validates the
/// response itself.
fn openai_response_format(request: &GenerationRequest) -> Value {
    if request.response_schema.is_null() {
        return json!({ "response_format": { "type": "json_object" } });
    }

    json!({
        "response_format": {
            "type": "json_schema",
            "json_schema": {
                "name": RESPONSE_SCHEMA_NAME,
                "schema": request.response_schema,
                "strict": false,
            }
        }
    })
}

/// System prompt with the response schema appended, for providers without
/// a structured-output parameter.
fn preamble_with_schema(request: &GenerationRequest) -> String {
    if request.response_schema.is_null() {
        return request.system_prompt.clone();
    }

    format!(
        "{}\n\n## Response Schema\nThe JSON object must validate against this JSON schema:\n{}",
        request.system_prompt.trim_end(),
        request.response_schema
    )
}

/// Extracts text content from assistant content choices.
fn extract_text_content(choice: &OneOrMany<AssistantContent>) -> String {
    choice
        .iter()
        .filter_map(|content| match content {
            AssistantContent::Text(text) => Some(text.text()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("")
}

impl std::fmt::Debug for CompletionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionProvider")
            .field("provider", &self.provider_name())
            .field("model", &self.model_name())
            .finish()
    }
}

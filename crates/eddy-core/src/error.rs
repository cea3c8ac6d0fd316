//! Error types for eddy operations.

use std::fmt;

use strum::IntoStaticStr;

use crate::types::RecommendationResult;

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias for eddy operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur while producing parameter recommendations.
///
/// Per-parameter validation problems are never reported through this type;
/// they are recorded on the individual [`ParameterRecommendation`] entries so
/// callers always receive a structured answer when generation itself succeeded.
///
/// [`ParameterRecommendation`]: crate::ParameterRecommendation
#[derive(Debug, thiserror::Error, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Error {
    /// The requested turbulence model is not in the registry.
    #[error("unknown turbulence model: {key}")]
    UnknownModel { key: String },

    /// A model definition violates the registry invariants.
    #[error("invalid model definition: {key}: {message}")]
    InvalidModel { key: String, message: String },

    /// The embedding or vector index service failed (transport, auth, timeout).
    #[error("retrieval service error: {message}")]
    RetrievalService {
        message: String,
        #[source]
        source: Option<BoxedError>,
    },

    /// The generative model service failed (transport, auth, timeout).
    #[error("generation service error: {message}")]
    GenerationService {
        message: String,
        #[source]
        source: Option<BoxedError>,
    },

    /// The generative model answered with something that is not structured data.
    #[error("generation parse error: {message}")]
    GenerationParse { message: String },

    /// A fatal failure of the recommendation pipeline.
    ///
    /// Carries a best-effort result with status `failed` so the caller can
    /// still render the schema and the explanation of what went wrong.
    #[error("recommendation pipeline failed: {cause}")]
    PipelineFailed {
        #[source]
        cause: Box<Error>,
        result: Box<RecommendationResult>,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Creates an unknown model error.
    pub fn unknown_model(key: impl fmt::Display) -> Self {
        Self::UnknownModel {
            key: key.to_string(),
        }
    }

    /// Creates an invalid model error.
    pub fn invalid_model(key: impl fmt::Display, message: impl fmt::Display) -> Self {
        Self::InvalidModel {
            key: key.to_string(),
            message: message.to_string(),
        }
    }

    /// Creates a retrieval service error.
    pub fn retrieval_service(message: impl fmt::Display) -> Self {
        Self::RetrievalService {
            message: message.to_string(),
            source: None,
        }
    }

    /// Creates a retrieval service error with an underlying cause.
    pub fn retrieval_service_with(
        message: impl fmt::Display,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::RetrievalService {
            message: message.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a generation service error.
    pub fn generation_service(message: impl fmt::Display) -> Self {
        Self::GenerationService {
            message: message.to_string(),
            source: None,
        }
    }

    /// Creates a generation service error with an underlying cause.
    pub fn generation_service_with(
        message: impl fmt::Display,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::GenerationService {
            message: message.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a generation parse error.
    pub fn generation_parse(message: impl fmt::Display) -> Self {
        Self::GenerationParse {
            message: message.to_string(),
        }
    }

    /// Wraps a fatal cause together with the best-effort failed result.
    pub fn pipeline_failed(cause: Error, result: RecommendationResult) -> Self {
        Self::PipelineFailed {
            cause: Box::new(cause),
            result: Box::new(result),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl fmt::Display) -> Self {
        Self::Config(message.to_string())
    }

    /// Returns the error kind as a snake_case string, for logging.
    pub fn kind(&self) -> &'static str {
        self.into()
    }

    /// Returns true if the failed operation may succeed when retried.
    ///
    /// Only generation service failures are transient; parse failures mean the
    /// model violated its output contract and are not retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::GenerationService { .. })
    }

    /// Returns the root cause when this is a pipeline failure, or `self` otherwise.
    pub fn root_cause(&self) -> &Error {
        match self {
            Self::PipelineFailed { cause, .. } => cause.root_cause(),
            other => other,
        }
    }

    /// Returns the best-effort result attached to a pipeline failure.
    pub fn partial_result(&self) -> Option<&RecommendationResult> {
        match self {
            Self::PipelineFailed { result, .. } => Some(result),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_generation_service_errors_are_retryable() {
        assert!(Error::generation_service("connection reset").is_retryable());
        assert!(!Error::generation_parse("not json").is_retryable());
        assert!(!Error::retrieval_service("index down").is_retryable());
        assert!(!Error::unknown_model("foo").is_retryable());
    }

    #[test]
    fn kind_is_snake_case() {
        assert_eq!(Error::unknown_model("foo").kind(), "unknown_model");
        assert_eq!(Error::generation_parse("x").kind(), "generation_parse");
    }

    #[test]
    fn display_includes_context() {
        let error = Error::unknown_model("invalid_model_xyz");
        assert_eq!(
            error.to_string(),
            "unknown turbulence model: invalid_model_xyz"
        );
    }
}

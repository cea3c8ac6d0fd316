use std::sync::Arc;

use eddy_core::{
    BoxedEmbedder, BoxedGenerativeModel, BoxedVectorIndex, DocumentChunk, Error,
    GenerationRequest, ModelRegistry, RecommendationResult, Result, TurbulenceModel,
};

use super::{PipelineConfig, PipelineStatus, TRACING_TARGET};
use crate::generator::RecommendationGenerator;
use crate::prompt::PromptBuilder;
use crate::rag::{RetrievalQuery, Retriever};

/// Retrieval-augmented turbulence parameter recommendation.
///
/// The pipeline is cheap to clone and can be shared across tasks; concurrent
/// calls share only the read-only model registry.
#[derive(Clone)]
pub struct RecommendationPipeline {
    inner: Arc<PipelineInner>,
}

struct PipelineInner {
    registry: Arc<ModelRegistry>,
    retriever: Retriever,
    prompts: PromptBuilder,
    generator: RecommendationGenerator,
    config: PipelineConfig,
}

impl RecommendationPipeline {
    /// Creates a pipeline from its external services.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid.
    pub fn new(
        registry: Arc<ModelRegistry>,
        embedder: BoxedEmbedder,
        index: BoxedVectorIndex,
        model: BoxedGenerativeModel,
        config: PipelineConfig,
    ) -> Result<Self> {
        config.validate()?;

        tracing::debug!(
            target: TRACING_TARGET,
            models = registry.len(),
            embedding_model = embedder.model_name(),
            index = index.backend_name(),
            generation_model = model.model_name(),
            "Created recommendation pipeline"
        );

        let inner = PipelineInner {
            retriever: Retriever::new(embedder, index, config.retriever.clone()),
            prompts: PromptBuilder::new(config.prompt.clone()),
            generator: RecommendationGenerator::new(model, config.generator.clone()),
            registry,
            config,
        };

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Returns the pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.inner.config
    }

    /// Returns the model registry.
    pub fn registry(&self) -> &ModelRegistry {
        &self.inner.registry
    }

    /// Returns the supported turbulence models in registration order.
    pub fn available_models(&self) -> &[Arc<TurbulenceModel>] {
        self.inner.registry.list()
    }

    /// Returns the full definition of a turbulence model.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownModel`] if `key` is not registered.
    pub fn model_info(&self, key: &str) -> Result<Arc<TurbulenceModel>> {
        self.inner.registry.get(key)
    }

    /// Produces parameter recommendations for a turbulence model.
    ///
    /// Retrieval failures degrade to an empty context and are recorded in
    /// the result's warnings. Transient generation failures are retried with
    /// backoff.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownModel`] unchanged, before any service call, if
    /// `model_key` is not registered. Returns [`Error::PipelineFailed`],
    /// carrying a failed result, when generation fails for good.
    #[tracing::instrument(
        skip(self, description, focus),
        target = TRACING_TARGET,
        fields(description_chars = description.len(), focus = focus.is_some())
    )]
    pub async fn generate_recommendations(
        &self,
        model_key: &str,
        description: &str,
        focus: Option<&str>,
    ) -> Result<RecommendationResult> {
        let inner = &self.inner;
        let model = inner.registry.get(model_key)?;

        let query = RetrievalQuery::for_model(&model, description, focus, inner.retriever.config());
        let mut warnings = Vec::new();
        let context = match inner.retriever.retrieve(&query).await {
            Ok(context) => context,
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    model = %model.key,
                    error = %error,
                    "Literature retrieval failed, continuing without context"
                );
                warnings.push(format!(
                    "literature retrieval failed, recommendations use no context: {error}"
                ));
                Vec::new()
            }
        };

        let request = inner.prompts.build(model, description, focus, &context);
        match self.generate_with_retry(&request).await {
            Ok(mut result) => {
                prepend(&mut result.warnings, warnings);
                tracing::info!(
                    target: TRACING_TARGET,
                    model = %result.model_key,
                    status = %result.status,
                    documents = result.documents_used(),
                    confidence = result.overall_confidence,
                    "Generated recommendations"
                );
                Ok(result)
            }
            Err(error) => {
                let mut failed = RecommendationGenerator::failed_result(&request, &error);
                prepend(&mut failed.warnings, warnings);
                tracing::error!(
                    target: TRACING_TARGET,
                    model = %failed.model_key,
                    kind = error.kind(),
                    error = %error,
                    "Recommendation pipeline failed"
                );
                Err(Error::pipeline_failed(error, failed))
            }
        }
    }

    /// Searches the literature index directly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RetrievalService`] if the search fails.
    pub async fn search_documents(&self, query: &str, top_k: usize) -> Result<Vec<DocumentChunk>> {
        self.inner.retriever.search(query, top_k).await
    }

    /// Reports the state of the pipeline's external dependencies.
    ///
    /// Index failures are reported in the status rather than returned.
    pub async fn status(&self) -> PipelineStatus {
        let inner = &self.inner;
        let index = inner.retriever.index();
        let embedder = inner.retriever.embedder();

        let (index_stats, index_error) = match index.stats().await {
            Ok(stats) => (Some(stats), None),
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    backend = index.backend_name(),
                    error = %error,
                    "Failed to read index statistics"
                );
                (None, Some(error.to_string()))
            }
        };

        PipelineStatus {
            index_backend: index.backend_name().to_owned(),
            index_stats,
            index_error,
            embedding_model: embedder.model_name().to_owned(),
            embedding_dimensions: embedder.dimensions(),
            generation_model: inner.generator.model_name().to_owned(),
            models: inner.registry.keys().map(str::to_owned).collect(),
        }
    }

    async fn generate_with_retry(&self, request: &GenerationRequest) -> Result<RecommendationResult> {
        let retry = &self.inner.config.retry;
        let attempts = retry.max_generation_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.inner.generator.generate(request).await {
                Ok(result) => return Ok(result),
                Err(error) if error.is_retryable() && attempt < attempts => {
                    let backoff = retry.backoff(attempt);
                    tracing::warn!(
                        target: TRACING_TARGET,
                        attempt,
                        max_attempts = attempts,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %error,
                        "Generation failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

impl std::fmt::Debug for RecommendationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecommendationPipeline")
            .field("models", &self.inner.registry.len())
            .field("retriever", &self.inner.retriever)
            .field("generator", &self.inner.generator)
            .finish()
    }
}

fn prepend(target: &mut Vec<String>, mut leading: Vec<String>) {
    leading.append(target);
    *target = leading;
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use eddy_core::{IndexMatch, ParameterStatus, RecommendationStatus};
    use eddy_test::{MockEmbedder, MockGenerativeModel, MockVectorIndex, mock_response};
    use serde_json::json;

    use super::*;

    const DIMS: usize = 8;
    const PIPE_FLOW: &str = "fully-developed turbulent pipe flow, Re=50000";

    struct Harness {
        embedder: MockEmbedder,
        index: MockVectorIndex,
        model: MockGenerativeModel,
        pipeline: RecommendationPipeline,
    }

    fn harness(index: MockVectorIndex, model: MockGenerativeModel) -> Harness {
        let embedder = MockEmbedder::new(DIMS);
        let pipeline = RecommendationPipeline::new(
            Arc::new(ModelRegistry::builtin()),
            Arc::new(embedder.clone()),
            Arc::new(index.clone()),
            Arc::new(model.clone()),
            PipelineConfig::default(),
        )
        .unwrap();
        Harness {
            embedder,
            index,
            model,
            pipeline,
        }
    }

    fn k_epsilon() -> Arc<TurbulenceModel> {
        ModelRegistry::global().get("k_epsilon").unwrap()
    }

    fn literature() -> MockVectorIndex {
        MockVectorIndex::new(DIMS).with_matches([
            IndexMatch::new("a", 0.92)
                .with_text("Launder and Spalding recommend Cmu = 0.09 for equilibrium flows.")
                .with_field("source", json!("launder1974.pdf")),
            IndexMatch::new("b", 0.81)
                .with_text("Pipe flow calibrations keep C2e close to 1.92.")
                .with_field("source", json!("pope2000.pdf")),
        ])
    }

    #[tokio::test]
    async fn outputs_exactly_the_schema_parameters_for_every_model() {
        for model in ModelRegistry::global().list() {
            let h = harness(MockVectorIndex::new(DIMS), MockGenerativeModel::for_model(model));
            let result = h
                .pipeline
                .generate_recommendations(&model.key, PIPE_FLOW, None)
                .await
                .unwrap();

            let names: Vec<_> = result.recommendations.iter().map(|r| r.name.as_str()).collect();
            let expected: Vec<_> = model.parameter_names().collect();
            assert_eq!(names, expected, "model {}", model.key);
        }
    }

    #[tokio::test]
    async fn empty_retrieval_marks_context_absent() {
        let h = harness(MockVectorIndex::new(DIMS), MockGenerativeModel::for_model(&k_epsilon()));
        let result = h
            .pipeline
            .generate_recommendations("k_epsilon", PIPE_FLOW, None)
            .await
            .unwrap();

        assert!(!result.context_used);
        assert!(result.citations.is_empty());
        assert!(result.recommendations.iter().all(|r| r.citations.is_empty()));

        let request = h.model.last_request().unwrap();
        assert!(!request.context_used());
        assert!(request.system_prompt.contains("Rely on general domain knowledge"));
    }

    #[tokio::test]
    async fn k_epsilon_pipe_flow_without_literature() {
        let h = harness(MockVectorIndex::new(DIMS), MockGenerativeModel::for_model(&k_epsilon()));
        let result = h
            .pipeline
            .generate_recommendations("k_epsilon", PIPE_FLOW, None)
            .await
            .unwrap();

        assert!(matches!(
            result.status,
            RecommendationStatus::Complete | RecommendationStatus::Partial
        ));
        for name in ["Cmu", "C1e", "C2e", "sigma_k", "sigma_e"] {
            let r = result.recommendation(name).unwrap();
            assert!(!r.rationale.contains("[S"));
            assert!(r.rationale.contains("no literature retrieved"));
        }
    }

    #[tokio::test]
    async fn retrieved_passages_become_citations() {
        let h = harness(literature(), MockGenerativeModel::for_model(&k_epsilon()));
        let result = h
            .pipeline
            .generate_recommendations("k_epsilon", PIPE_FLOW, Some("near-wall"))
            .await
            .unwrap();

        assert!(result.context_used);
        assert_eq!(result.documents_used(), 2);
        assert_eq!(result.citations[0].source, "launder1974.pdf");
        assert_eq!(h.embedder.calls(), 1);
        assert_eq!(h.index.calls(), 1);

        let request = h.model.last_request().unwrap();
        assert!(request.user_prompt.contains("[S1] launder1974.pdf"));
        assert!(request.user_prompt.contains("**Focus Area**: near-wall"));
    }

    #[tokio::test]
    async fn out_of_range_value_is_flagged_below_ceiling() {
        let response = json!({
            "parameters": {
                "Cmu": { "value": 0.5, "confidence": 0.99, "rationale": "strong swirl" },
                "C1e": { "value": 1.44, "confidence": 0.8, "rationale": "standard" },
                "C2e": { "value": 1.92, "confidence": 0.8, "rationale": "standard" },
                "sigma_k": { "value": 1.0, "confidence": 0.8, "rationale": "standard" },
                "sigma_e": { "value": 1.3, "confidence": 0.8, "rationale": "standard" },
            }
        });
        let h = harness(MockVectorIndex::new(DIMS), MockGenerativeModel::new(response.to_string()));
        let result = h
            .pipeline
            .generate_recommendations("k_epsilon", PIPE_FLOW, None)
            .await
            .unwrap();

        let cmu = result.recommendation("Cmu").unwrap();
        assert_eq!(cmu.status, ParameterStatus::OutOfRange);
        assert!(cmu.confidence < h.pipeline.config().generator.out_of_range_ceiling);
    }

    #[tokio::test]
    async fn missing_parameter_yields_partial_result() {
        let response = mock_response(&k_epsilon(), |name| name != "sigma_k");
        let h = harness(MockVectorIndex::new(DIMS), MockGenerativeModel::new(response));
        let result = h
            .pipeline
            .generate_recommendations("k_epsilon", PIPE_FLOW, None)
            .await
            .unwrap();

        assert_eq!(result.status, RecommendationStatus::Partial);
        let sigma_k = result.recommendation("sigma_k").unwrap();
        assert_eq!(sigma_k.status, ParameterStatus::Missing);
        assert_eq!(sigma_k.confidence, 0.0);
        assert_eq!(result.clean_count(), 4);
    }

    #[tokio::test]
    async fn repeated_calls_are_identical() {
        let h = harness(literature(), MockGenerativeModel::for_model(&k_epsilon()));
        let first = h
            .pipeline
            .generate_recommendations("k_epsilon", PIPE_FLOW, Some("wall"))
            .await
            .unwrap();
        let mut second = h
            .pipeline
            .generate_recommendations("k_epsilon", PIPE_FLOW, Some("wall"))
            .await
            .unwrap();

        second.generated_at = first.generated_at;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn unknown_model_fails_before_any_service_call() {
        let h = harness(literature(), MockGenerativeModel::for_model(&k_epsilon()));
        let error = h
            .pipeline
            .generate_recommendations("invalid_model_xyz", PIPE_FLOW, None)
            .await
            .unwrap_err();

        assert!(matches!(error, Error::UnknownModel { ref key } if key == "invalid_model_xyz"));
        assert_eq!(h.embedder.calls(), 0);
        assert_eq!(h.index.calls(), 0);
        assert_eq!(h.model.calls(), 0);
    }

    #[tokio::test]
    async fn retrieval_failure_degrades_to_no_context() {
        let index = MockVectorIndex::new(DIMS).failing("connection refused");
        let h = harness(index, MockGenerativeModel::for_model(&k_epsilon()));
        let result = h
            .pipeline
            .generate_recommendations("k_epsilon", PIPE_FLOW, None)
            .await
            .unwrap();

        assert!(!result.context_used);
        assert!(result.warnings[0].contains("connection refused"));
        assert_eq!(result.status, RecommendationStatus::Complete);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_generation_failure_is_retried_once() {
        let model = MockGenerativeModel::for_model(&k_epsilon()).with_failure("rate limited");
        let h = harness(MockVectorIndex::new(DIMS), model);

        let started = tokio::time::Instant::now();
        let result = h
            .pipeline
            .generate_recommendations("k_epsilon", PIPE_FLOW, None)
            .await
            .unwrap();

        assert_eq!(h.model.calls(), 2);
        assert!(started.elapsed() >= Duration::from_secs(1));
        assert_eq!(result.status, RecommendationStatus::Complete);
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_generation_failure_surfaces_failed_result() {
        let model = MockGenerativeModel::for_model(&k_epsilon())
            .with_failure("rate limited")
            .with_failure("rate limited");
        let h = harness(MockVectorIndex::new(DIMS), model);

        let error = h
            .pipeline
            .generate_recommendations("k_epsilon", PIPE_FLOW, None)
            .await
            .unwrap_err();

        assert_eq!(h.model.calls(), 2);
        assert!(matches!(error, Error::PipelineFailed { .. }));
        assert!(matches!(error.root_cause(), Error::GenerationService { .. }));

        let partial = error.partial_result().unwrap();
        assert_eq!(partial.status, RecommendationStatus::Failed);
        assert_eq!(partial.recommendations.len(), 5);
        assert!(partial.warnings.iter().any(|w| w.contains("rate limited")));
    }

    #[tokio::test]
    async fn parse_failure_is_not_retried() {
        let h = harness(MockVectorIndex::new(DIMS), MockGenerativeModel::new("no JSON here"));
        let error = h
            .pipeline
            .generate_recommendations("k_epsilon", PIPE_FLOW, None)
            .await
            .unwrap_err();

        assert_eq!(h.model.calls(), 1);
        assert!(matches!(error.root_cause(), Error::GenerationParse { .. }));
    }

    #[tokio::test]
    async fn search_documents_returns_top_matches() {
        let h = harness(literature(), MockGenerativeModel::new("{}"));
        let chunks = h.pipeline.search_documents("Cmu pipe flow", 1).await.unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].id, "a");
    }

    #[tokio::test]
    async fn status_reports_dependencies() {
        let h = harness(literature(), MockGenerativeModel::new("{}"));
        let status = h.pipeline.status().await;

        assert_eq!(status.index_backend, "mock");
        assert_eq!(status.index_stats.unwrap().total_vectors, 2);
        assert_eq!(status.dimensions_consistent(), Some(true));
        assert_eq!(
            status.models,
            ["k_epsilon", "k_omega_sst", "spalart_allmaras", "reynolds_stress"]
        );
    }

    #[tokio::test]
    async fn status_reports_index_failure() {
        let h = harness(MockVectorIndex::new(DIMS).failing("down"), MockGenerativeModel::new("{}"));
        let status = h.pipeline.status().await;

        assert!(status.index_error.unwrap().contains("down"));
        assert!(status.index_stats.is_none());
    }
}

use eddy_core::{
    BoxedGenerativeModel, Error, GenerationRequest, ParameterRecommendation, ParameterSpec,
    ParameterStatus, RecommendationResult, RecommendationStatus, Result,
};
use jiff::Timestamp;
use serde_json::Value;

use super::citation;
use super::response::{RawParameter, RawResponse, number};
use super::{GeneratorConfig, TRACING_TARGET};

/// Rationale suffix for recommendations made without retrieved literature.
const NO_CONTEXT_SUFFIX: &str = "(based on general domain knowledge; no literature retrieved)";

/// Invokes the generative model and validates its answer against the schema.
///
/// Cheap to clone; the model client is shared.
#[derive(Clone)]
pub struct RecommendationGenerator {
    model: BoxedGenerativeModel,
    config: GeneratorConfig,
}

impl RecommendationGenerator {
    /// Creates a generator over `model`.
    pub fn new(model: BoxedGenerativeModel, config: GeneratorConfig) -> Self {
        Self { model, config }
    }

    /// Returns the generator configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Returns the generative model identifier.
    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// Generates and validates recommendations for the request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GenerationService`] if the model call fails or exceeds
    /// the configured timeout, and [`Error::GenerationParse`] if the response
    /// is not structured data.
    #[tracing::instrument(
        skip_all,
        target = TRACING_TARGET,
        fields(model = %request.model.key, context = request.context.len())
    )]
    pub async fn generate(&self, request: &GenerationRequest) -> Result<RecommendationResult> {
        let timeout = self.config.timeout();
        let raw = tokio::time::timeout(timeout, self.model.generate(request))
            .await
            .map_err(|_| {
                Error::generation_service(format!(
                    "generation timed out after {}s",
                    timeout.as_secs()
                ))
            })??;

        tracing::debug!(
            target: TRACING_TARGET,
            generator = self.model.model_name(),
            response_chars = raw.len(),
            "Received generator response"
        );

        self.interpret(request, &raw)
    }

    /// Parses and validates a raw generator response.
    ///
    /// The result lists every schema parameter in schema order, whatever the
    /// response contained.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GenerationParse`] if `raw` is not a JSON object.
    pub fn interpret(&self, request: &GenerationRequest, raw: &str) -> Result<RecommendationResult> {
        let response = RawResponse::parse(raw)?;
        let mut warnings = Vec::new();

        let mut entries = match response.parameters {
            Some(entries) => entries,
            None => {
                warnings.push("generator response contained no parameters section".to_owned());
                Vec::new()
            }
        };

        let recommendations: Vec<ParameterRecommendation> = request
            .model
            .parameters
            .iter()
            .map(|spec| {
                let entry = entries
                    .iter()
                    .position(|e| spec.is_named(&e.name))
                    .map(|i| entries.remove(i));
                self.validate(request, spec, entry)
            })
            .collect();

        for extra in &entries {
            warnings.push(format!(
                "ignored parameter '{}' not defined by {}",
                extra.name, request.model.key
            ));
        }

        let overall_confidence = match response.overall_confidence.as_ref().and_then(number) {
            Some(c) if c.is_finite() => {
                if !(0.0..=1.0).contains(&c) {
                    warnings.push(format!("overall confidence {c} clamped into [0, 1]"));
                }
                c.clamp(0.0, 1.0)
            }
            _ => mean(recommendations.iter().map(|r| r.confidence)),
        };

        let clean = recommendations.iter().filter(|r| r.is_clean()).count();
        let mut result = RecommendationResult {
            model_key: request.model.key.clone(),
            model_name: request.model.name.clone(),
            status: RecommendationStatus::from_tally(clean, recommendations.len()),
            recommendations,
            citations: request.context.clone(),
            summary: String::new(),
            context_used: request.context_used(),
            overall_confidence,
            key_considerations: response.key_considerations,
            sensitivity_warnings: response.sensitivity_warnings,
            validation_recommendations: response.validation_recommendations,
            warnings,
            generated_at: Timestamp::now(),
        };
        result.summary = result.headline();

        tracing::info!(
            target: TRACING_TARGET,
            model = %result.model_key,
            status = %result.status,
            valid = clean,
            total = result.recommendations.len(),
            "Validated recommendations"
        );

        Ok(result)
    }

    /// Validates one schema parameter against what the generator wrote.
    fn validate(
        &self,
        request: &GenerationRequest,
        spec: &ParameterSpec,
        entry: Option<RawParameter>,
    ) -> ParameterRecommendation {
        let Some(entry) = entry else {
            return ParameterRecommendation::missing(
                &spec.name,
                &spec.symbol,
                "not provided by the generator",
            );
        };
        let Some(raw_value) = entry.value else {
            return ParameterRecommendation::missing(
                &spec.name,
                &spec.symbol,
                "generator provided no value",
            );
        };

        let mut notes = Vec::new();
        let value = number(&raw_value).filter(|v| v.is_finite());
        let status = match value {
            None => {
                notes.push(format!("value {raw_value} is not a number"));
                ParameterStatus::Unparsable
            }
            Some(v) if !spec.accepts(v) => {
                notes.push(format!("value {v} outside valid range {}", spec.range));
                ParameterStatus::OutOfRange
            }
            Some(v) => {
                if !spec.is_typical(v)
                    && let Some(typical) = spec.typical
                {
                    notes.push(format!("value {v} outside typical range {typical}"));
                }
                ParameterStatus::Valid
            }
        };

        let confidence = match status {
            ParameterStatus::Unparsable => 0.0,
            _ => {
                let confidence = self.confidence(request, entry.confidence.as_ref(), &mut notes);
                if status == ParameterStatus::OutOfRange {
                    let cap = self.config.out_of_range_cap();
                    if confidence > cap {
                        notes.push(format!("confidence capped at {cap:.2} for out-of-range value"));
                    }
                    confidence.min(cap)
                } else {
                    confidence
                }
            }
        };

        let (rationale, citations) =
            cite(request, entry.rationale.unwrap_or_default().trim(), &mut notes);

        ParameterRecommendation {
            name: spec.name.clone(),
            symbol: spec.symbol.clone(),
            value,
            confidence,
            rationale,
            status,
            notes,
            citations,
        }
    }

    /// Reads the reported confidence, deriving or clamping it as needed.
    fn confidence(
        &self,
        request: &GenerationRequest,
        raw: Option<&Value>,
        notes: &mut Vec<String>,
    ) -> f64 {
        match raw.and_then(number).filter(|c| c.is_finite()) {
            Some(c) if (0.0..=1.0).contains(&c) => c,
            Some(c) => {
                notes.push(format!("confidence {c} clamped into [0, 1]"));
                c.clamp(0.0, 1.0)
            }
            None => {
                let derived = self
                    .config
                    .derived_confidence(request.context_used(), request.mean_relevance());
                notes.push(format!(
                    "confidence not reported; derived {derived:.2} from retrieved context coverage"
                ));
                derived
            }
        }
    }

    /// Builds the best-effort result of a failed generation call.
    ///
    /// Every schema parameter is listed as missing and the error text is
    /// recorded as a warning.
    pub fn failed_result(request: &GenerationRequest, error: &Error) -> RecommendationResult {
        let note = format!("generation failed: {error}");
        let recommendations: Vec<ParameterRecommendation> = request
            .model
            .parameters
            .iter()
            .map(|p| ParameterRecommendation::missing(&p.name, &p.symbol, &note))
            .collect();

        let mut result = RecommendationResult {
            model_key: request.model.key.clone(),
            model_name: request.model.name.clone(),
            recommendations,
            citations: request.context.clone(),
            status: RecommendationStatus::Failed,
            summary: String::new(),
            context_used: request.context_used(),
            overall_confidence: 0.0,
            key_considerations: Vec::new(),
            sensitivity_warnings: Vec::new(),
            validation_recommendations: Vec::new(),
            warnings: vec![error.to_string()],
            generated_at: Timestamp::now(),
        };
        result.summary = result.headline();
        result
    }
}

impl std::fmt::Debug for RecommendationGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecommendationGenerator")
            .field("model", &self.model.model_name())
            .field("config", &self.config)
            .finish()
    }
}

/// Reconciles rationale citations with the passages that were in the prompt.
fn cite(
    request: &GenerationRequest,
    rationale: &str,
    notes: &mut Vec<String>,
) -> (String, Vec<String>) {
    let labels = request.labels();
    let citations = citation::filter(rationale, &labels);

    if !citations.removed.is_empty() {
        notes.push(format!(
            "removed citation of unknown passage(s): {}",
            citations.removed.join(", ")
        ));
    }

    let mut text = citations.text;
    if !request.context_used() {
        append(&mut text, NO_CONTEXT_SUFFIX);
    } else if citations.kept.is_empty() {
        append(
            &mut text,
            &format!(
                "(informed by {} retrieved passage(s); none cited specifically)",
                labels.len()
            ),
        );
    }

    (text, citations.kept)
}

fn append(text: &mut String, suffix: &str) {
    if !text.is_empty() {
        text.push(' ');
    }
    text.push_str(suffix);
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let len = values.len();
    if len == 0 {
        return 0.0;
    }
    values.sum::<f64>() / len as f64
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use eddy_core::{DocumentChunk, ModelRegistry};
    use eddy_test::MockGenerativeModel;
    use serde_json::json;

    use super::*;
    use crate::prompt::PromptBuilder;

    fn request(context: &[DocumentChunk]) -> GenerationRequest {
        let model = ModelRegistry::global().get("k_epsilon").unwrap();
        PromptBuilder::default().build(model, "pipe flow, Re=50000", None, context)
    }

    fn generator(response: &str) -> RecommendationGenerator {
        RecommendationGenerator::new(
            Arc::new(MockGenerativeModel::new(response)),
            GeneratorConfig::default(),
        )
    }

    fn entry(value: Value, confidence: Value, rationale: &str) -> Value {
        json!({ "value": value, "confidence": confidence, "rationale": rationale })
    }

    fn full_response(overrides: &[(&str, Value)]) -> String {
        let mut parameters = json!({
            "Cmu": entry(json!(0.09), json!(0.8), "standard"),
            "C1e": entry(json!(1.44), json!(0.8), "standard"),
            "C2e": entry(json!(1.92), json!(0.8), "standard"),
            "sigma_k": entry(json!(1.0), json!(0.8), "standard"),
            "sigma_e": entry(json!(1.3), json!(0.8), "standard"),
        });
        for (name, value) in overrides {
            parameters[*name] = value.clone();
        }
        json!({ "parameters": parameters }).to_string()
    }

    #[tokio::test]
    async fn valid_response_is_complete() {
        let result = generator(&full_response(&[]))
            .generate(&request(&[]))
            .await
            .unwrap();

        assert_eq!(result.status, RecommendationStatus::Complete);
        let names: Vec<_> = result.recommendations.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Cmu", "C1e", "C2e", "sigma_k", "sigma_e"]);
        assert!((result.overall_confidence - 0.8).abs() < 1e-9);
        assert!(result.summary.starts_with("Generated 5/5 parameters"));
    }

    #[test]
    fn missing_parameter_yields_partial() {
        let response = full_response(&[("C2e", Value::Null)]);
        let result = generator("").interpret(&request(&[]), &response).unwrap();

        assert_eq!(result.status, RecommendationStatus::Partial);
        let c2e = result.recommendation("C2e").unwrap();
        assert_eq!(c2e.status, ParameterStatus::Missing);
        assert_eq!(c2e.confidence, 0.0);
        assert_eq!(result.recommendation("Cmu").unwrap().value, Some(0.09));
    }

    #[test]
    fn out_of_range_value_is_kept_with_capped_confidence() {
        let response = full_response(&[("Cmu", entry(json!(0.5), json!(0.95), "aggressive"))]);
        let generator = generator("");
        let result = generator.interpret(&request(&[]), &response).unwrap();

        let cmu = result.recommendation("Cmu").unwrap();
        assert_eq!(cmu.status, ParameterStatus::OutOfRange);
        assert_eq!(cmu.value, Some(0.5));
        assert!(cmu.confidence < generator.config().out_of_range_ceiling);
        assert_eq!(result.status, RecommendationStatus::Partial);
    }

    #[test]
    fn unparsable_value_is_flagged() {
        let response = full_response(&[("C1e", entry(json!("about 1.4"), json!(0.8), "x"))]);
        let result = generator("").interpret(&request(&[]), &response).unwrap();

        let c1e = result.recommendation("C1e").unwrap();
        assert_eq!(c1e.status, ParameterStatus::Unparsable);
        assert!(c1e.value.is_none());
        assert_eq!(result.clean_count(), 4);
    }

    #[test]
    fn numeric_strings_and_aliases_are_accepted() {
        let response = full_response(&[]).replace("\"C1e\"", "\"C1epsilon\"");
        let response = response.replace("0.09", "\"0.09\"");
        let result = generator("").interpret(&request(&[]), &response).unwrap();

        assert_eq!(result.status, RecommendationStatus::Complete);
        assert_eq!(result.recommendation("Cmu").unwrap().value, Some(0.09));
    }

    #[test]
    fn confidence_outside_unit_interval_is_clamped() {
        let response = full_response(&[("Cmu", entry(json!(0.09), json!(1.7), "x"))]);
        let result = generator("").interpret(&request(&[]), &response).unwrap();

        let cmu = result.recommendation("Cmu").unwrap();
        assert_eq!(cmu.confidence, 1.0);
        assert!(cmu.notes.iter().any(|n| n.contains("clamped")));
    }

    #[test]
    fn missing_confidence_is_derived_from_context() {
        let response = full_response(&[("Cmu", json!({ "value": 0.09 }))]);
        let generator = generator("");

        let without = generator.interpret(&request(&[]), &response).unwrap();
        assert_eq!(without.recommendation("Cmu").unwrap().confidence, 0.35);

        let context = [DocumentChunk::new("a", "Cmu = 0.09", "launder.pdf", 1.0)];
        let with = generator.interpret(&request(&context), &response).unwrap();
        assert!((with.recommendation("Cmu").unwrap().confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn extra_parameters_are_dropped_with_warning() {
        let response = full_response(&[("C3e", entry(json!(1.0), json!(0.5), "x"))]);
        let result = generator("").interpret(&request(&[]), &response).unwrap();

        assert_eq!(result.recommendations.len(), 5);
        assert!(result.warnings.iter().any(|w| w.contains("C3e")));
    }

    #[test]
    fn no_context_rationales_do_not_cite() {
        let response = full_response(&[("Cmu", entry(json!(0.09), json!(0.8), "see [S1]"))]);
        let result = generator("").interpret(&request(&[]), &response).unwrap();

        for r in &result.recommendations {
            assert!(r.citations.is_empty());
            assert!(!r.rationale.contains("[S"));
            assert!(r.rationale.ends_with(NO_CONTEXT_SUFFIX));
        }
        assert!(result.citations.is_empty());
        assert!(!result.context_used);
    }

    #[test]
    fn context_rationales_reference_passages() {
        let context = [DocumentChunk::new("a", "Cmu = 0.09", "launder.pdf", 0.9)];
        let response = full_response(&[("Cmu", entry(json!(0.09), json!(0.8), "per [S1] [S4]"))]);
        let result = generator("").interpret(&request(&context), &response).unwrap();

        let cmu = result.recommendation("Cmu").unwrap();
        assert_eq!(cmu.citations, ["S1"]);
        assert_eq!(cmu.rationale, "per [S1]");
        assert!(cmu.notes.iter().any(|n| n.contains("S4")));

        let c1e = result.recommendation("C1e").unwrap();
        assert!(c1e.rationale.contains("1 retrieved passage"));
        assert_eq!(result.citations.len(), 1);
    }

    #[test]
    fn reported_overall_confidence_is_preserved() {
        let response = json!({
            "parameters": {},
            "overall_confidence": 0.65,
            "key_considerations": ["Fully developed inflow"],
        })
        .to_string();
        let result = generator("").interpret(&request(&[]), &response).unwrap();

        assert_eq!(result.overall_confidence, 0.65);
        assert_eq!(result.key_considerations, ["Fully developed inflow"]);
        assert_eq!(result.status, RecommendationStatus::Failed);
    }

    #[tokio::test]
    async fn unparsable_response_is_a_parse_error() {
        let error = generator("not json").generate(&request(&[])).await.unwrap_err();
        assert!(matches!(error, Error::GenerationParse { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_model_times_out_as_service_error() {
        let model = MockGenerativeModel::new(full_response(&[])).with_delay(Duration::from_secs(120));
        let generator = RecommendationGenerator::new(Arc::new(model), GeneratorConfig::default());

        let error = generator.generate(&request(&[])).await.unwrap_err();
        assert!(error.is_retryable());
    }

    #[test]
    fn failed_result_lists_every_parameter() {
        let request = request(&[]);
        let result = RecommendationGenerator::failed_result(
            &request,
            &Error::generation_service("rate limited"),
        );

        assert_eq!(result.status, RecommendationStatus::Failed);
        assert_eq!(result.recommendations.len(), 5);
        assert!(result.recommendations.iter().all(|r| r.confidence == 0.0));
        assert!(result.warnings[0].contains("rate limited"));
    }
}

use std::fmt::Write as _;
use std::sync::Arc;

use eddy_core::{DocumentChunk, GenerationRequest, TurbulenceModel};

use super::{PromptConfig, TRACING_TARGET, response_schema};

/// Marker appended to a passage cut to fit the context budget.
const TRUNCATION_MARKER: &str = "...[truncated]";

/// Builds generation requests from a model schema, user text and context.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    config: PromptConfig,
}

impl PromptBuilder {
    /// Creates a prompt builder with the given configuration.
    pub fn new(config: PromptConfig) -> Self {
        Self { config }
    }

    /// Returns the builder configuration.
    pub fn config(&self) -> &PromptConfig {
        &self.config
    }

    /// Assembles the generation request.
    ///
    /// Passages are placed in descending relevance order until the context
    /// budget is exhausted; the request's `context` lists exactly the passages
    /// that made it into the prompt, labeled `S1`, `S2`, ... in that order.
    pub fn build(
        &self,
        model: Arc<TurbulenceModel>,
        description: &str,
        focus: Option<&str>,
        context: &[DocumentChunk],
    ) -> GenerationRequest {
        let focus = focus.map(str::trim).filter(|f| !f.is_empty());
        let (research, included) = self.select_context(context);

        tracing::debug!(
            target: TRACING_TARGET,
            model = %model.key,
            offered = context.len(),
            included = included.len(),
            context_chars = research.chars().count(),
            "Assembled prompt context"
        );

        GenerationRequest {
            system_prompt: system_prompt(&model, !included.is_empty()),
            user_prompt: user_prompt(&model, description.trim(), focus, &research),
            response_schema: response_schema(&model),
            context: included,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            model,
        }
    }

    /// Selects passages by relevance within the character budget.
    fn select_context(&self, context: &[DocumentChunk]) -> (String, Vec<DocumentChunk>) {
        let mut ranked: Vec<&DocumentChunk> =
            context.iter().filter(|c| !c.text.trim().is_empty()).collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

        let budget = self.config.max_context_chars;
        let mut research = String::new();
        let mut used = 0;
        let mut included = Vec::new();

        for chunk in ranked {
            let header = passage_header(included.len(), chunk);
            let text = chunk.text.trim();
            let size = header.chars().count() + text.chars().count() + 2;

            if used + size <= budget {
                let _ = write!(research, "{header}\n{text}\n\n");
                used += size;
                included.push(chunk.clone());
                continue;
            }

            if included.is_empty() {
                let room = budget
                    .saturating_sub(header.chars().count() + TRUNCATION_MARKER.len() + 2);
                if room > 0 {
                    let cut: String = text.chars().take(room).collect();
                    let _ = write!(research, "{header}\n{cut}{TRUNCATION_MARKER}\n\n");
                    included.push(chunk.clone());
                }
            }
            break;
        }

        (research.trim_end().to_owned(), included)
    }
}

fn passage_header(index: usize, chunk: &DocumentChunk) -> String {
    format!(
        "--- [{}] {} (relevance: {:.3}) ---",
        GenerationRequest::label(index),
        chunk.reference(),
        chunk.score
    )
}

fn system_prompt(model: &TurbulenceModel, has_context: bool) -> String {
    let mut prompt = format!(
        "You are a world-class expert in Computational Fluid Dynamics (CFD) and turbulence \
         modeling, specializing in parameter selection for the {name} turbulence model.\n\n\
         ## Model Overview: {name}\n\
         **Description**: {description}\n\
         **Category**: {category}\n",
        name = model.name,
        description = model.description,
        category = model.category,
    );

    for (title, items) in [
        ("Applications", &model.applications),
        ("Known Limitations", &model.limitations),
    ] {
        if items.is_empty() {
            continue;
        }
        let _ = write!(prompt, "\n**{title}**:\n");
        for item in items {
            let _ = writeln!(prompt, "- {item}");
        }
    }

    prompt.push_str("\n## Parameters to Recommend\n");
    prompt.push_str("| Name | Symbol | Description | Valid range | Typical range | Default |\n");
    prompt.push_str("|------|--------|-------------|-------------|---------------|---------|\n");
    for p in &model.parameters {
        let typical = p.typical.map(|t| t.to_string()).unwrap_or_else(|| "n/a".into());
        let default = p.default_value.map(|d| d.to_string()).unwrap_or_else(|| "varies".into());
        let _ = writeln!(
            prompt,
            "| {} | {} | {} | {} | {typical} | {default} |",
            p.name, p.symbol, p.description, p.range
        );
    }

    prompt.push_str(
        "\n## Your Task\n\
         Recommend one value for every parameter listed above and for no other parameter. \
         Consider the dominant flow physics, geometry effects such as curvature and separation, \
         boundary conditions and wall treatment, and the engineering application. \
         Any value outside the typical range must be explicitly justified in its rationale.\n",
    );

    if has_context {
        prompt.push_str(
            "\n## Research Context Policy\n\
             The user message contains research passages labeled [S1], [S2], and so on. \
             Base your recommendations on them where possible and cite the supporting labels \
             in each rationale, for example \"[S1]\". Do not cite labels that are not present.\n",
        );
    } else {
        prompt.push_str(
            "\n## Research Context Policy\n\
             No research passages were retrieved for this request. Rely on general domain \
             knowledge and standard published calibrations, do not cite or invent literature \
             sources, and lower your confidence accordingly.\n",
        );
    }

    let _ = write!(
        prompt,
        "\n## Response Format\n\
         Respond with a single valid JSON object and nothing else, using this structure:\n\
         {{\n  \"model_name\": \"{key}\",\n  \"parameters\": {{\n",
        key = model.key
    );
    let count = model.parameters.len();
    for (i, p) in model.parameters.iter().enumerate() {
        let comma = if i + 1 < count { "," } else { "" };
        let _ = writeln!(
            prompt,
            "    \"{}\": {{\"value\": <number>, \"confidence\": <0 to 1>, \"rationale\": \"<explanation>\"}}{comma}",
            p.name
        );
    }
    prompt.push_str(
        "  },\n  \"overall_confidence\": <0 to 1>,\n  \
         \"key_considerations\": [\"<consideration>\"],\n  \
         \"sensitivity_warnings\": [\"<warning>\"],\n  \
         \"validation_recommendations\": [\"<validation approach>\"]\n}\n",
    );

    prompt.push_str(
        "\n## Guidelines\n\
         - Provide exact numerical values, not ranges\n\
         - Explain each choice in terms of physics and literature\n\
         - Tailor recommendations to the described application\n\
         - Assess confidence honestly\n\
         - Highlight parameters that may need case-specific tuning\n",
    );

    prompt
}

fn user_prompt(
    model: &TurbulenceModel,
    description: &str,
    focus: Option<&str>,
    research: &str,
) -> String {
    let mut prompt = String::new();

    if !research.is_empty() {
        let _ = write!(prompt, "## Research Context\n{research}\n\n");
    }

    prompt.push_str("## Task Requirements\n");
    let _ = writeln!(prompt, "**Turbulence Model**: {} ({})", model.name, model.key);
    if !description.is_empty() {
        let _ = writeln!(prompt, "**Application Description**: {description}");
    }
    if let Some(focus) = focus {
        let _ = writeln!(prompt, "**Focus Area**: {focus}");
    }

    prompt.push_str("\n## Request\n");
    if research.is_empty() {
        let _ = write!(
            prompt,
            "Please recommend parameter values for the {} turbulence model for the application \
             above. No research context is available, so rely on general domain knowledge.",
            model.name
        );
    } else {
        let _ = write!(
            prompt,
            "Please recommend parameter values for the {} turbulence model based on the research \
             context and application requirements above.",
            model.name
        );
    }

    prompt
}

#[cfg(test)]
mod tests {
    use eddy_core::ModelRegistry;

    use super::*;

    fn k_epsilon() -> Arc<TurbulenceModel> {
        ModelRegistry::global().get("k_epsilon").unwrap()
    }

    fn chunk(id: &str, score: f64, text: &str) -> DocumentChunk {
        DocumentChunk::new(id, text, format!("{id}.pdf"), score)
    }

    #[test]
    fn system_prompt_lists_every_parameter() {
        let request = PromptBuilder::default().build(k_epsilon(), "pipe flow", None, &[]);
        for name in ["Cmu", "C1e", "C2e", "sigma_k", "sigma_e"] {
            assert!(request.system_prompt.contains(&format!("| {name} |")));
            assert!(request.system_prompt.contains(&format!("\"{name}\": {{")));
        }
        assert!(request.system_prompt.contains("0.05 to 0.15"));
        assert!(request.system_prompt.contains("outside the typical range"));
    }

    #[test]
    fn empty_context_requests_general_knowledge() {
        let request = PromptBuilder::default().build(k_epsilon(), "pipe flow", None, &[]);
        assert!(!request.context_used());
        assert!(request.system_prompt.contains("Rely on general domain knowledge"));
        assert!(request.system_prompt.contains("lower your confidence"));
        assert!(!request.user_prompt.contains("## Research Context"));
        assert!(!request.user_prompt.contains("[S1]"));
    }

    #[test]
    fn user_prompt_carries_description_and_focus() {
        let request = PromptBuilder::default().build(
            k_epsilon(),
            "  fully-developed turbulent pipe flow, Re=50000 ",
            Some("near-wall"),
            &[],
        );
        assert!(request.user_prompt.contains(
            "**Application Description**: fully-developed turbulent pipe flow, Re=50000\n"
        ));
        assert!(request.user_prompt.contains("**Focus Area**: near-wall"));
    }

    #[test]
    fn passages_are_labeled_by_relevance() {
        let context = [chunk("low", 0.3, "low text"), chunk("high", 0.9, "high text")];
        let request = PromptBuilder::default().build(k_epsilon(), "pipe flow", None, &context);

        assert_eq!(request.context[0].id, "high");
        assert_eq!(request.context[1].id, "low");
        let first = request.user_prompt.find("[S1] high.pdf").unwrap();
        let second = request.user_prompt.find("[S2] low.pdf").unwrap();
        assert!(first < second);
        assert!(request.system_prompt.contains("cite the supporting labels"));
    }

    #[test]
    fn budget_drops_least_relevant_passages() {
        let config = PromptConfig::default().with_max_context_chars(250);
        let context = [
            chunk("a", 0.9, &"a".repeat(80)),
            chunk("b", 0.8, &"b".repeat(80)),
            chunk("c", 0.95, &"c".repeat(60)),
        ];
        let request = PromptBuilder::new(config).build(k_epsilon(), "pipe flow", None, &context);

        let ids: Vec<_> = request.context.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["c", "a"]);
        assert!(!request.user_prompt.contains("bbbb"));
    }

    #[test]
    fn oversized_first_passage_is_truncated() {
        let config = PromptConfig::default().with_max_context_chars(100);
        let context = [chunk("a", 0.9, &"x".repeat(500))];
        let request = PromptBuilder::new(config).build(k_epsilon(), "pipe flow", None, &context);

        assert_eq!(request.context.len(), 1);
        assert!(request.user_prompt.contains(TRUNCATION_MARKER));
    }

    #[test]
    fn build_is_deterministic() {
        let context = [chunk("a", 0.9, "text")];
        let builder = PromptBuilder::default();
        assert_eq!(
            builder.build(k_epsilon(), "pipe", Some("wall"), &context),
            builder.build(k_epsilon(), "pipe", Some("wall"), &context)
        );
    }
}

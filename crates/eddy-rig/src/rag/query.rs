//! Search query construction.

use eddy_core::TurbulenceModel;

use super::RetrieverConfig;

/// Maximum number of parameter-derived terms in a constructed query.
const MAX_PARAMETER_TERMS: usize = 10;

/// Key words taken from each parameter description.
const DESCRIPTION_WORDS_PER_PARAMETER: usize = 2;

/// Number of model applications included in a constructed query.
const MAX_APPLICATIONS: usize = 3;

/// Synonyms appended per matched term.
const SYNONYMS_PER_TERM: usize = 2;

/// Turbulence terminology and the phrasings literature commonly uses instead.
const SYNONYMS: &[(&str, &[&str])] = &[
    ("k-epsilon", &["k-ε", "k epsilon"]),
    ("k-omega", &["k-ω", "k omega"]),
    ("sst", &["Shear Stress Transport", "Menter SST"]),
    ("spalart", &["Spalart-Allmaras", "SA model"]),
    ("reynolds", &["Reynolds stress", "RSM"]),
    ("viscosity", &["turbulent viscosity", "eddy viscosity"]),
    ("dissipation", &["energy dissipation", "epsilon"]),
    ("production", &["turbulence production", "kinetic energy production"]),
    ("constants", &["coefficients", "parameters"]),
    ("wall", &["near-wall", "wall treatment"]),
    ("boundary", &["boundary conditions", "BC"]),
    ("separation", &["flow separation", "separated flow"]),
    ("pressure", &["pressure gradient", "adverse pressure gradient"]),
];

/// A nearest-neighbour search request in text form.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalQuery {
    /// Query text to embed.
    pub text: String,
    /// Maximum number of passages to return.
    pub top_k: usize,
    /// Passages scoring below this are excluded.
    pub min_score: Option<f64>,
}

impl RetrievalQuery {
    /// Creates a query with no score threshold.
    pub fn new(text: impl Into<String>, top_k: usize) -> Self {
        Self {
            text: text.into(),
            top_k,
            min_score: None,
        }
    }

    /// Sets the score threshold.
    pub fn with_min_score(mut self, min_score: Option<f64>) -> Self {
        self.min_score = min_score;
        self
    }

    /// Builds the literature search query for a recommendation request.
    ///
    /// Combines the model's names, category, parameter vocabulary and main
    /// applications with the user's description and focus area, then
    /// normalizes whitespace and caps the length.
    pub fn for_model(
        model: &TurbulenceModel,
        description: &str,
        focus: Option<&str>,
        config: &RetrieverConfig,
    ) -> Self {
        let mut parts: Vec<String> = vec![
            model.name.clone(),
            model.key.replace('_', "-"),
            format!("{} turbulence model", model.category),
        ];

        let mut terms = Vec::new();
        for parameter in &model.parameters {
            terms.push(parameter.name.clone());
            let description = parameter.description.to_lowercase();
            terms.extend(
                description
                    .split_whitespace()
                    .filter(|w| w.chars().count() > 4 && w.chars().all(char::is_alphabetic))
                    .take(DESCRIPTION_WORDS_PER_PARAMETER)
                    .map(str::to_owned),
            );
        }
        parts.extend(terms.into_iter().take(MAX_PARAMETER_TERMS));
        parts.extend(model.applications.iter().take(MAX_APPLICATIONS).cloned());

        for extra in [Some(description), focus].into_iter().flatten() {
            let extra = extra.trim();
            if !extra.is_empty() {
                parts.push(extra.to_owned());
            }
        }

        let mut text = normalize(&parts.join(" "));
        if config.expand_synonyms {
            text = expand_synonyms(&text);
        }

        Self::new(truncate_chars(&text, config.max_query_chars), config.top_k)
            .with_min_score(config.min_score)
    }
}

/// Appends common synonyms for turbulence terms found in `query`.
pub fn expand_synonyms(query: &str) -> String {
    let lower = query.to_lowercase();
    let expansions: Vec<&str> = SYNONYMS
        .iter()
        .filter(|(term, _)| lower.contains(term))
        .flat_map(|(_, synonyms)| synonyms.iter().take(SYNONYMS_PER_TERM).copied())
        .collect();

    if expansions.is_empty() {
        return query.to_owned();
    }
    format!("{query} {}", expansions.join(" "))
}

fn normalize(text: &str) -> String {
    text.replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => text[..end].trim_end().to_owned(),
        None => text.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use eddy_core::ModelRegistry;

    use super::*;

    fn query(description: &str, focus: Option<&str>, config: &RetrieverConfig) -> RetrievalQuery {
        let model = ModelRegistry::global().get("k_epsilon").unwrap();
        RetrievalQuery::for_model(&model, description, focus, config)
    }

    #[test]
    fn includes_model_vocabulary_and_user_text() {
        let q = query(
            "fully-developed turbulent pipe flow, Re=50000",
            Some("near-wall"),
            &RetrieverConfig::default(),
        );
        assert!(q.text.starts_with("k-ε (k-epsilon) k-epsilon RANS turbulence model Cmu"));
        assert!(q.text.contains("fully-developed turbulent pipe flow, Re=50000"));
        assert!(q.text.ends_with("near-wall"));
        assert_eq!(q.top_k, 5);
        assert!(!q.text.contains('_'));
        assert!(!q.text.contains("  "));
    }

    #[test]
    fn length_is_capped() {
        let config = RetrieverConfig {
            max_query_chars: 40,
            ..Default::default()
        };
        let q = query(&"pipe ".repeat(200), None, &config);
        assert!(q.text.chars().count() <= 40);
    }

    #[test]
    fn blank_focus_is_ignored() {
        let config = RetrieverConfig::default();
        assert_eq!(query("pipe", Some("   "), &config), query("pipe", None, &config));
    }

    #[test]
    fn synonyms_match_case_insensitively() {
        let expanded = expand_synonyms("k-omega SST near the Wall");
        assert!(expanded.ends_with("k-ω k omega Shear Stress Transport Menter SST near-wall wall treatment"));
        assert_eq!(expand_synonyms("jet"), "jet");
    }
}

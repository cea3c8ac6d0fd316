//! Parsing of raw generator output into an untrusted intermediate record.

use eddy_core::{Error, Result};
use serde_json::{Deserializer, Map, Value};

/// One parameter entry as the generator wrote it.
#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct RawParameter {
    pub name: String,
    pub value: Option<Value>,
    pub confidence: Option<Value>,
    pub rationale: Option<String>,
}

/// The generator response with every field still unvalidated.
#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct RawResponse {
    /// `None` when the response has no usable `parameters` section.
    pub parameters: Option<Vec<RawParameter>>,
    pub overall_confidence: Option<Value>,
    pub key_considerations: Vec<String>,
    pub sensitivity_warnings: Vec<String>,
    pub validation_recommendations: Vec<String>,
}

impl RawResponse {
    /// Parses the raw response text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GenerationParse`] if the text is not a JSON object.
    pub fn parse(text: &str) -> Result<Self> {
        let body = json_body(text);
        let value = Deserializer::from_str(body)
            .into_iter::<Value>()
            .next()
            .ok_or_else(|| Error::generation_parse("response is empty"))?
            .map_err(|e| Error::generation_parse(format!("response is not valid JSON: {e}")))?;
        let Value::Object(mut object) = value else {
            return Err(Error::generation_parse("response is not a JSON object"));
        };

        Ok(Self {
            parameters: object.remove("parameters").and_then(parameters),
            overall_confidence: object.remove("overall_confidence"),
            key_considerations: string_list(object.remove("key_considerations")),
            sensitivity_warnings: string_list(object.remove("sensitivity_warnings")),
            validation_recommendations: string_list(object.remove("validation_recommendations")),
        })
    }
}

/// Reads a number, or a string holding one.
pub(super) fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Strips Markdown code fences and any prose before the JSON object.
///
/// Text after the object is left in place; only the first JSON value is read.
fn json_body(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```") {
        body = rest.split_once('\n').map_or("", |(_, rest)| rest);
        body = body.trim_end().strip_suffix("```").unwrap_or(body).trim();
    }
    match body.find('{') {
        Some(start) => &body[start..],
        None => body,
    }
}

fn parameters(value: Value) -> Option<Vec<RawParameter>> {
    match value {
        Value::Object(entries) => Some(
            entries
                .into_iter()
                .map(|(name, entry)| parameter(name, entry))
                .collect(),
        ),
        Value::Array(entries) => Some(
            entries
                .into_iter()
                .filter_map(|entry| match entry {
                    Value::Object(mut fields) => {
                        let name = fields
                            .remove("name")
                            .or_else(|| fields.remove("parameter"))
                            .and_then(|n| n.as_str().map(str::to_owned))?;
                        Some(parameter(name, Value::Object(fields)))
                    }
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    }
}

fn parameter(name: String, entry: Value) -> RawParameter {
    match entry {
        Value::Object(mut fields) => RawParameter {
            name,
            value: take_present(&mut fields, "value"),
            confidence: take_present(&mut fields, "confidence"),
            rationale: fields
                .remove("rationale")
                .and_then(|r| r.as_str().map(str::to_owned)),
        },
        Value::Null => RawParameter {
            name,
            ..Default::default()
        },
        bare => RawParameter {
            name,
            value: Some(bare),
            ..Default::default()
        },
    }
}

fn take_present(fields: &mut Map<String, Value>, key: &str) -> Option<Value> {
    fields.remove(key).filter(|v| !v.is_null())
}

fn string_list(value: Option<Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_owned()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn strips_code_fences() {
        let raw = RawResponse::parse("```json\n{\"parameters\": {\"Cmu\": 0.09}}\n```").unwrap();
        let parameters = raw.parameters.unwrap();
        assert_eq!(parameters[0].name, "Cmu");
        assert_eq!(parameters[0].value, Some(json!(0.09)));
    }

    #[test]
    fn tolerates_surrounding_prose() {
        let raw = RawResponse::parse("Here you go: {\"parameters\": {}} Hope it helps.").unwrap();
        assert_eq!(raw.parameters, Some(Vec::new()));
    }

    #[test]
    fn ignores_prose_after_the_object() {
        let raw = RawResponse::parse(
            "{\"parameters\": {\"Cmu\": 0.09}}\n\nThese values follow Launder and Spalding {1974}.",
        )
        .unwrap();
        let parameters = raw.parameters.unwrap();
        assert_eq!(parameters[0].name, "Cmu");
        assert_eq!(parameters[0].value, Some(json!(0.09)));
    }

    #[test]
    fn empty_response_is_a_parse_error() {
        let error = RawResponse::parse("  ").unwrap_err();
        assert!(matches!(error, Error::GenerationParse { .. }));
    }

    #[test]
    fn accepts_parameter_arrays() {
        let raw = RawResponse::parse(
            r#"{"parameters": [{"name": "C1e", "value": "1.44", "confidence": 0.7}]}"#,
        )
        .unwrap();
        let parameters = raw.parameters.unwrap();
        assert_eq!(parameters[0].name, "C1e");
        assert_eq!(number(parameters[0].value.as_ref().unwrap()), Some(1.44));
    }

    #[test]
    fn missing_parameters_section_is_not_an_error() {
        let raw = RawResponse::parse(r#"{"overall_confidence": 0.5}"#).unwrap();
        assert!(raw.parameters.is_none());
    }

    #[test]
    fn non_json_is_a_parse_error() {
        let error = RawResponse::parse("I cannot help with that.").unwrap_err();
        assert!(matches!(error, Error::GenerationParse { .. }));

        let error = RawResponse::parse("[1, 2, 3]").unwrap_err();
        assert!(matches!(error, Error::GenerationParse { .. }));
    }

    #[test]
    fn string_lists_skip_blank_entries() {
        let raw = RawResponse::parse(
            r#"{"parameters": {}, "key_considerations": ["wall treatment", " ", 3]}"#,
        )
        .unwrap();
        assert_eq!(raw.key_considerations, ["wall treatment"]);
    }
}

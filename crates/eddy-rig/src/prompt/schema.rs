//! JSON schema of the expected generator response.

use eddy_core::TurbulenceModel;
use serde_json::{Map, Value, json};

/// Builds the response schema for `model`.
///
/// Every schema parameter is a required property; no other parameter names
/// are allowed. Valid ranges are stated in the descriptions rather than as
/// bounds, since a justified out-of-range value is still a valid answer.
pub fn response_schema(model: &TurbulenceModel) -> Value {
    let mut properties = Map::new();
    for parameter in &model.parameters {
        properties.insert(
            parameter.name.clone(),
            json!({
                "type": "object",
                "description": format!(
                    "{} ({}), valid range {}",
                    parameter.description, parameter.symbol, parameter.range
                ),
                "properties": {
                    "value": { "type": "number" },
                    "confidence": { "type": "number", "minimum": 0.0, "maximum": 1.0 },
                    "rationale": { "type": "string" },
                },
                "required": ["value", "confidence", "rationale"],
            }),
        );
    }

    let names: Vec<&str> = model.parameter_names().collect();
    let string_list = json!({ "type": "array", "items": { "type": "string" } });

    json!({
        "type": "object",
        "properties": {
            "model_name": { "type": "string", "const": model.key },
            "parameters": {
                "type": "object",
                "properties": properties,
                "required": names,
                "additionalProperties": false,
            },
            "overall_confidence": { "type": "number", "minimum": 0.0, "maximum": 1.0 },
            "key_considerations": string_list,
            "sensitivity_warnings": string_list,
            "validation_recommendations": string_list,
        },
        "required": ["parameters"],
    })
}

#[cfg(test)]
mod tests {
    use eddy_core::ModelRegistry;

    use super::*;

    #[test]
    fn requires_every_parameter() {
        let model = ModelRegistry::global().get("k_epsilon").unwrap();
        let schema = response_schema(&model);
        let parameters = &schema["properties"]["parameters"];

        assert_eq!(
            parameters["required"],
            json!(["Cmu", "C1e", "C2e", "sigma_k", "sigma_e"])
        );
        assert_eq!(parameters["additionalProperties"], json!(false));
        let cmu = &parameters["properties"]["Cmu"];
        assert!(cmu["properties"]["value"].get("maximum").is_none());
        assert!(cmu["description"].as_str().unwrap().contains("C_μ"));
    }
}

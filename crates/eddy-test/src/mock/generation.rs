//! Mock generative model for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use eddy_core::prelude::*;
use serde_json::{Map, Value, json};

use super::lock;

/// Mock generative model for testing.
///
/// Answers from a script of queued outcomes, falling back to a fixed response
/// once the script is exhausted.
#[derive(Debug, Clone)]
pub struct MockGenerativeModel {
    fallback: String,
    delay: Option<Duration>,
    script: Arc<Mutex<VecDeque<Result<String>>>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
    calls: Arc<AtomicUsize>,
}

impl MockGenerativeModel {
    /// Creates a mock that always answers with `response`.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            fallback: response.into(),
            delay: None,
            script: Arc::default(),
            requests: Arc::default(),
            calls: Arc::default(),
        }
    }

    /// Creates a mock answering with a well-formed response for `model`.
    pub fn for_model(model: &TurbulenceModel) -> Self {
        Self::new(mock_response(model, |_| true))
    }

    /// Queues a response for the next unscripted call.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        lock(&self.script).push_back(Ok(response.into()));
        self
    }

    /// Queues a generation service failure for the next unscripted call.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        lock(&self.script).push_back(Err(Error::generation_service(message.into())));
        self
    }

    /// Delays every call by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Returns the number of `generate` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Returns the most recent request received.
    pub fn last_request(&self) -> Option<GenerationRequest> {
        lock(&self.requests).last().cloned()
    }
}

#[async_trait::async_trait]
impl GenerativeModel for MockGenerativeModel {
    fn model_name(&self) -> &str {
        "mock-generation"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.requests).push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match lock(&self.script).pop_front() {
            Some(outcome) => outcome,
            None => Ok(self.fallback.clone()),
        }
    }
}

/// Builds a well-formed JSON response for `model` using each parameter's
/// default value, including only the parameters accepted by `include`.
pub fn mock_response(model: &TurbulenceModel, include: impl Fn(&str) -> bool) -> String {
    let parameters: Map<String, Value> = model
        .parameters
        .iter()
        .filter(|p| include(&p.name))
        .map(|p| {
            let value = p.default_value.map_or(Value::Null, Value::from);
            let entry = json!({
                "value": value,
                "confidence": 0.8,
                "rationale": format!("Standard calibration of {}", p.name),
            });
            (p.name.clone(), entry)
        })
        .collect();

    json!({
        "parameters": parameters,
        "overall_confidence": 0.8,
        "key_considerations": ["Standard calibration"],
        "sensitivity_warnings": [],
        "validation_recommendations": ["Compare against experimental data"],
    })
    .to_string()
}

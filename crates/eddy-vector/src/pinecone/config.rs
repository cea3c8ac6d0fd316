//! Pinecone configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Control-plane endpoint used to resolve an index host.
pub const DEFAULT_CONTROLLER_URL: &str = "https://api.pinecone.io";

/// Data-plane API version sent with every request.
pub const API_VERSION: &str = "2024-07";

/// Default request timeout: 30 seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Pinecone configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PineconeConfig {
    /// Pinecone API key.
    pub api_key: String,
    /// Index name.
    pub index: String,
    /// Index host (e.g. "https://cfd-knowledge-base-abc123.svc.aped-4627-b74a.pinecone.io").
    ///
    /// Resolved through the control plane when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Namespace (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Vector dimensions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<usize>,
    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl PineconeConfig {
    /// Creates a new Pinecone configuration.
    pub fn new(api_key: impl Into<String>, index: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            index: index.into(),
            host: None,
            namespace: None,
            dimensions: None,
            timeout_secs: None,
        }
    }

    /// Sets the index host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Sets the vector dimensions.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    /// Returns the effective timeout, using the default if unset or zero.
    pub fn effective_timeout(&self) -> Duration {
        match self.timeout_secs {
            Some(secs) if secs > 0 => Duration::from_secs(secs),
            _ => DEFAULT_TIMEOUT,
        }
    }
}

/// Normalizes a host into a base URL without a trailing slash.
pub(super) fn base_url(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_owned()
    } else {
        format!("https://{host}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_adds_scheme() {
        assert_eq!(base_url("idx.svc.pinecone.io/"), "https://idx.svc.pinecone.io");
        assert_eq!(base_url("http://localhost:5080"), "http://localhost:5080");
    }

    #[test]
    fn effective_timeout_uses_default_when_zero() {
        let mut config = PineconeConfig::new("key", "index");
        assert_eq!(config.effective_timeout(), DEFAULT_TIMEOUT);
        config.timeout_secs = Some(0);
        assert_eq!(config.effective_timeout(), DEFAULT_TIMEOUT);
        config.timeout_secs = Some(5);
        assert_eq!(config.effective_timeout(), Duration::from_secs(5));
    }
}

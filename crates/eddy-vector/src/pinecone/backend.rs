//! Pinecone backend implementation over the REST data-plane API.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use super::PineconeConfig;
use super::config::{API_VERSION, DEFAULT_CONTROLLER_URL, base_url};
use crate::TRACING_TARGET;
use crate::error::{VectorError, VectorResult};
use crate::store::{CollectionStats, SearchOptions, SearchResult, VectorStoreBackend};

/// Pinecone backend implementation.
///
/// Without a configured host, the data-plane host is looked up on the first
/// request; a failed lookup is retried on the next one.
pub struct PineconeBackend {
    http: Client,
    host: OnceCell<String>,
    config: PineconeConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<&'a serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexStatsResponse {
    #[serde(default)]
    total_vector_count: u64,
    #[serde(default)]
    dimension: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct IndexDescription {
    host: String,
}

impl PineconeBackend {
    /// Creates a new Pinecone backend without contacting the service.
    pub fn new(config: &PineconeConfig) -> VectorResult<Self> {
        if config.api_key.is_empty() {
            return Err(VectorError::invalid_config("Pinecone API key is empty"));
        }

        let http = Client::builder()
            .timeout(config.effective_timeout())
            .user_agent(format!("eddy/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| VectorError::connection(e.to_string()))?;

        let host = OnceCell::new_with(config.host.as_deref().map(base_url));

        tracing::debug!(
            target: TRACING_TARGET,
            index = %config.index,
            host = ?host.get(),
            "Pinecone backend initialized"
        );

        Ok(Self {
            http,
            host,
            config: config.clone(),
        })
    }

    /// Returns the data-plane host, resolving it on first use.
    async fn host(&self) -> VectorResult<&str> {
        let host = self
            .host
            .get_or_try_init(|| Self::resolve_host(&self.http, &self.config))
            .await?;
        Ok(host)
    }

    /// Looks up the data-plane host of the configured index.
    async fn resolve_host(http: &Client, config: &PineconeConfig) -> VectorResult<String> {
        let url = format!("{DEFAULT_CONTROLLER_URL}/indexes/{}", config.index);
        let description: IndexDescription = Self::send(authorize(http.get(url), &config.api_key))
            .await
            .map_err(|e| match e {
                VectorError::CollectionNotFound(_) => {
                    VectorError::collection_not_found(&config.index)
                }
                other => other,
            })?
            .json()
            .await?;

        let host = base_url(&description.host);
        tracing::debug!(
            target: TRACING_TARGET,
            index = %config.index,
            host = %host,
            "Resolved Pinecone index host"
        );
        Ok(host)
    }

    async fn send(request: RequestBuilder) -> VectorResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => VectorError::authentication(body),
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => VectorError::timeout(body),
            StatusCode::NOT_FOUND => VectorError::collection_not_found(body),
            _ => VectorError::backend(format!("{} {body}", status.as_u16())),
        })
    }

    async fn post(&self, path: &str) -> VectorResult<RequestBuilder> {
        let host = self.host().await?;
        let request = self.http.post(format!("{host}{path}"));
        Ok(authorize(request, &self.config.api_key))
    }
}

fn authorize(request: RequestBuilder, api_key: &str) -> RequestBuilder {
    request
        .header("Api-Key", api_key)
        .header("X-Pinecone-API-Version", API_VERSION)
}

fn into_search_result(m: QueryMatch) -> SearchResult {
    SearchResult {
        id: m.id,
        score: m.score,
        metadata: m.metadata.unwrap_or_default(),
    }
}

#[async_trait]
impl VectorStoreBackend for PineconeBackend {
    fn name(&self) -> &'static str {
        "pinecone"
    }

    async fn search(
        &self,
        query: Vec<f32>,
        limit: usize,
        options: SearchOptions,
    ) -> VectorResult<Vec<SearchResult>> {
        let namespace = options.namespace.as_deref().or(self.config.namespace.as_deref());
        let body = QueryRequest {
            vector: &query,
            top_k: limit,
            include_metadata: true,
            include_values: false,
            namespace,
            filter: options.filter.as_ref(),
        };

        let response: QueryResponse = Self::send(self.post("/query").await?.json(&body))
            .await?
            .json()
            .await?;

        let results = response
            .matches
            .into_iter()
            .map(into_search_result)
            .filter(|r| options.min_score.is_none_or(|min| r.score >= min))
            .collect();

        Ok(results)
    }

    async fn stats(&self) -> VectorResult<CollectionStats> {
        let request = self.post("/describe_index_stats").await?;
        let response: IndexStatsResponse = Self::send(request.json(&serde_json::json!({})))
            .await?
            .json()
            .await?;

        Ok(CollectionStats {
            total_vectors: response.total_vector_count,
            dimensions: response.dimension,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_does_not_resolve_the_host() {
        let config = PineconeConfig::new("pc-test", "cfd-knowledge-base");
        let backend = PineconeBackend::new(&config).unwrap();
        assert!(backend.host.get().is_none());
    }

    #[test]
    fn configured_host_is_used_as_is() {
        let config =
            PineconeConfig::new("pc-test", "cfd-knowledge-base").with_host("cfd-abc.svc.pinecone.io");
        let backend = PineconeBackend::new(&config).unwrap();
        assert_eq!(
            backend.host.get().map(String::as_str),
            Some("https://cfd-abc.svc.pinecone.io")
        );
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let config = PineconeConfig::new("", "cfd-knowledge-base");
        assert!(PineconeBackend::new(&config).is_err());
    }

    #[test]
    fn query_body_uses_camel_case() {
        let vector = [0.1_f32, 0.2];
        let body = QueryRequest {
            vector: &vector,
            top_k: 8,
            include_metadata: true,
            include_values: false,
            namespace: None,
            filter: None,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["topK"], 8);
        assert_eq!(json["includeMetadata"], true);
        assert!(json.get("namespace").is_none());
    }

    #[test]
    fn parses_query_response() {
        let response: QueryResponse = serde_json::from_str(
            r#"{"matches":[{"id":"doc_0","score":0.87,
                "metadata":{"source":"menter1994.pdf","text_preview":"The SST model"}},
               {"id":"doc_1","score":0.5}],"namespace":""}"#,
        )
        .unwrap();

        let results: Vec<_> = response.matches.into_iter().map(into_search_result).collect();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].metadata["source"], "menter1994.pdf");
        assert!(results[1].metadata.is_empty());
    }

    #[test]
    fn parses_index_stats() {
        let stats: IndexStatsResponse = serde_json::from_str(
            r#"{"namespaces":{"":{"vectorCount":42}},"dimension":1536,
                "indexFullness":0.0,"totalVectorCount":42}"#,
        )
        .unwrap();

        assert_eq!(stats.total_vector_count, 42);
        assert_eq!(stats.dimension, Some(1536));
    }
}

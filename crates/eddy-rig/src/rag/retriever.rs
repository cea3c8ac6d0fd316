
use eddy_core::{
    BoxedEmbedder, BoxedVectorIndex, ChunkLocator, DocumentChunk, Error, IndexMatch, IndexQuery,
    Result,
};
use serde_json::Value;

use super::{RetrievalQuery, RetrieverConfig, TRACING_TARGET};

/// Source assigned to passages whose metadata names none.
const UNKNOWN_SOURCE: &str = "unknown";

/// Semantic search over the literature index.
///
/// Cheap to clone; the embedder and index are shared.
#[derive(Clone)]
pub struct Retriever {
    embedder: BoxedEmbedder,
    index: BoxedVectorIndex,
    config: RetrieverConfig,
}

impl Retriever {
    /// Creates a retriever over `index`, embedding queries with `embedder`.
    pub fn new(embedder: BoxedEmbedder, index: BoxedVectorIndex, config: RetrieverConfig) -> Self {
        Self {
            embedder,
            index,
            config,
        }
    }

    /// Returns the retriever configuration.
    pub fn config(&self) -> &RetrieverConfig {
        &self.config
    }

    /// Returns the query embedder.
    pub fn embedder(&self) -> &BoxedEmbedder {
        &self.embedder
    }

    /// Returns the vector index.
    pub fn index(&self) -> &BoxedVectorIndex {
        &self.index
    }

    /// Retrieves at most `query.top_k` passages, most relevant first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RetrievalService`] if embedding or search fails or
    /// exceeds the configured timeout, or if the query embedding does not
    /// match the index dimension.
    #[tracing::instrument(
        skip_all,
        target = TRACING_TARGET,
        fields(top_k = query.top_k, query_chars = query.text.len())
    )]
    pub async fn retrieve(&self, query: &RetrievalQuery) -> Result<Vec<DocumentChunk>> {
        if query.top_k == 0 {
            return Ok(Vec::new());
        }

        let timeout = self.config.timeout();
        let matches = tokio::time::timeout(timeout, self.search_index(query))
            .await
            .map_err(|_| {
                Error::retrieval_service(format!(
                    "retrieval timed out after {}s",
                    timeout.as_secs()
                ))
            })??;

        let raw = matches.len();
        let mut chunks: Vec<DocumentChunk> = matches
            .into_iter()
            .filter(|m| query.min_score.is_none_or(|min| m.score >= min))
            .map(into_chunk)
            .collect();
        chunks.sort_by(|a, b| b.score.total_cmp(&a.score));
        chunks.truncate(query.top_k);

        tracing::debug!(
            target: TRACING_TARGET,
            matches = raw,
            returned = chunks.len(),
            top_score = ?chunks.first().map(|c| c.score),
            "Retrieved passages"
        );

        Ok(chunks)
    }

    /// Searches the index for free text with the configured threshold.
    pub async fn search(&self, text: &str, top_k: usize) -> Result<Vec<DocumentChunk>> {
        let query = RetrievalQuery::new(text, top_k).with_min_score(self.config.min_score);
        self.retrieve(&query).await
    }

    async fn search_index(&self, query: &RetrievalQuery) -> Result<Vec<IndexMatch>> {
        let vector = self.embedder.embed(&query.text).await?;

        let expected = self
            .index
            .dimensions()
            .unwrap_or_else(|| self.embedder.dimensions());
        if vector.len() != expected {
            return Err(Error::retrieval_service(format!(
                "embedding model {} produced {} dimensions but the {} index expects {expected}",
                self.embedder.model_name(),
                vector.len(),
                self.index.backend_name(),
            )));
        }

        let index_query = IndexQuery::new(vector, query.top_k)
            .with_min_score(query.min_score)
            .with_namespace(self.config.namespace.clone());
        self.index.query(&index_query).await
    }
}

impl std::fmt::Debug for Retriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever")
            .field("embedder", &self.embedder.model_name())
            .field("index", &self.index.backend_name())
            .field("config", &self.config)
            .finish()
    }
}

fn into_chunk(m: IndexMatch) -> DocumentChunk {
    let IndexMatch {
        id,
        score,
        text,
        metadata,
    } = m;

    let text = text
        .or_else(|| string_field(metadata.get("text")))
        .or_else(|| string_field(metadata.get("text_preview")))
        .unwrap_or_default();
    let source = string_field(metadata.get("source"))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNKNOWN_SOURCE.to_owned());

    let locator = ChunkLocator {
        page: int_field(metadata.get("page")),
        section: string_field(metadata.get("section")),
        chunk_index: int_field(metadata.get("chunk_index")),
        total_chunks: int_field(metadata.get("total_chunks")),
    };

    DocumentChunk::new(id, text, source, score).with_locator(locator)
}

fn string_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn int_field(value: Option<&Value>) -> Option<u32> {
    match value? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use eddy_test::{MockEmbedder, MockVectorIndex};
    use serde_json::json;

    use super::*;

    fn retriever(index: MockVectorIndex) -> Retriever {
        Retriever::new(
            Arc::new(MockEmbedder::new(4)),
            Arc::new(index),
            RetrieverConfig::default(),
        )
    }

    #[tokio::test]
    async fn sorts_by_descending_score_and_truncates() {
        let index = MockVectorIndex::new(4).with_matches([
            IndexMatch::new("a", 0.4).with_text("a"),
            IndexMatch::new("b", 0.9).with_text("b"),
            IndexMatch::new("c", 0.7).with_text("c"),
        ]);
        let chunks = retriever(index)
            .retrieve(&RetrievalQuery::new("pipe flow", 2))
            .await
            .unwrap();

        let ids: Vec<_> = chunks.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["b", "c"]);
    }

    #[tokio::test]
    async fn threshold_excludes_low_scores() {
        let index = MockVectorIndex::new(4).with_matches([
            IndexMatch::new("a", 0.4),
            IndexMatch::new("b", 0.9),
        ]);
        let chunks = retriever(index)
            .retrieve(&RetrievalQuery::new("pipe flow", 5).with_min_score(Some(0.5)))
            .await
            .unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].id, "b");
    }

    #[tokio::test]
    async fn empty_index_is_not_an_error() {
        let chunks = retriever(MockVectorIndex::new(4))
            .retrieve(&RetrievalQuery::new("pipe flow", 5))
            .await
            .unwrap();
        assert!(chunks.is_empty());
    }

    #[tokio::test]
    async fn maps_metadata_into_chunk() {
        let index = MockVectorIndex::new(4).with_matches([IndexMatch::new("a", 0.8)
            .with_field("text_preview", json!("Cmu = 0.09 is standard"))
            .with_field("source", json!("launder1974.pdf"))
            .with_field("page", json!(3))
            .with_field("chunk_index", json!("2"))]);
        let chunks = retriever(index)
            .retrieve(&RetrievalQuery::new("Cmu", 5))
            .await
            .unwrap();

        let chunk = &chunks[0];
        assert_eq!(chunk.text, "Cmu = 0.09 is standard");
        assert_eq!(chunk.source, "launder1974.pdf");
        let locator = chunk.locator.as_ref().unwrap();
        assert_eq!(locator.page, Some(3));
        assert_eq!(locator.chunk_index, Some(2));
    }

    #[tokio::test]
    async fn missing_source_is_unknown() {
        let index = MockVectorIndex::new(4).with_matches([IndexMatch::new("a", 0.8)]);
        let chunks = retriever(index)
            .retrieve(&RetrievalQuery::new("Cmu", 5))
            .await
            .unwrap();
        assert_eq!(chunks[0].source, "unknown");
        assert!(chunks[0].locator.is_none());
    }

    #[tokio::test]
    async fn dimension_mismatch_is_a_service_error() {
        let retriever = Retriever::new(
            Arc::new(MockEmbedder::new(3)),
            Arc::new(MockVectorIndex::new(4)),
            RetrieverConfig::default(),
        );
        let error = retriever.search("Cmu", 5).await.unwrap_err();
        assert!(matches!(error, Error::RetrievalService { .. }));
    }

    #[tokio::test]
    async fn index_failure_is_a_service_error() {
        let index = MockVectorIndex::new(4).failing("connection refused");
        let error = retriever(index).search("Cmu", 5).await.unwrap_err();
        assert!(matches!(error, Error::RetrievalService { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_index_times_out() {
        let index = MockVectorIndex::new(4).with_delay(Duration::from_secs(60));
        let error = retriever(index).search("Cmu", 5).await.unwrap_err();
        assert!(error.to_string().contains("timed out"));
    }
}

//! Mock vector index for testing.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use eddy_core::prelude::*;

/// Mock vector index for testing.
///
/// Returns a fixed set of matches regardless of the query vector, honouring
/// `top_k` and `min_score` the way a real backend would.
#[derive(Debug, Clone)]
pub struct MockVectorIndex {
    dimensions: usize,
    matches: Vec<IndexMatch>,
    failure: Option<String>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockVectorIndex {
    /// Creates an empty mock index of the given dimension.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            matches: Vec::new(),
            failure: None,
            delay: None,
            calls: Arc::default(),
        }
    }

    /// Sets the matches returned by every query.
    pub fn with_matches(mut self, matches: impl IntoIterator<Item = IndexMatch>) -> Self {
        self.matches = matches.into_iter().collect();
        self
    }

    /// Makes every query fail with a retrieval service error.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Delays every query by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Returns the number of `query` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl VectorIndex for MockVectorIndex {
    fn backend_name(&self) -> &str {
        "mock"
    }

    fn dimensions(&self) -> Option<usize> {
        Some(self.dimensions)
    }

    async fn query(&self, query: &IndexQuery) -> Result<Vec<IndexMatch>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.failure {
            return Err(Error::retrieval_service(message));
        }

        let mut matches: Vec<IndexMatch> = self
            .matches
            .iter()
            .filter(|m| query.min_score.is_none_or(|min| m.score >= min))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(query.top_k);
        Ok(matches)
    }

    async fn stats(&self) -> Result<IndexStats> {
        if let Some(message) = &self.failure {
            return Err(Error::retrieval_service(message));
        }
        Ok(IndexStats {
            total_vectors: self.matches.len() as u64,
            dimensions: Some(self.dimensions),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn top_k_keeps_highest_scores() {
        let index = MockVectorIndex::new(2).with_matches([
            IndexMatch::new("low", 0.2),
            IndexMatch::new("high", 0.9),
            IndexMatch::new("mid", 0.6),
        ]);

        let matches = index.query(&IndexQuery::new(vec![0.0, 1.0], 2)).await.unwrap();
        let ids: Vec<_> = matches.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["high", "mid"]);
        assert_eq!(index.calls(), 1);
    }
}

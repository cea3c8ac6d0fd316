//! Retrieved document passages.

use serde::{Deserialize, Serialize};

/// Where a chunk sits inside its source document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkLocator {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_chunks: Option<u32>,
}

impl ChunkLocator {
    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.page.is_none()
            && self.section.is_none()
            && self.chunk_index.is_none()
            && self.total_chunks.is_none()
    }
}

/// A passage returned by the retriever.
///
/// Chunks are created per retrieval call and never shared between calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    /// Opaque identifier assigned by the vector index.
    pub id: String,
    /// Passage text.
    pub text: String,
    /// Source document identifier (usually a file name).
    pub source: String,
    /// Optional location inside the source document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locator: Option<ChunkLocator>,
    /// Similarity score; higher is more relevant.
    pub score: f64,
}

impl DocumentChunk {
    /// Creates a chunk without a locator.
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        source: impl Into<String>,
        score: f64,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            source: source.into(),
            locator: None,
            score,
        }
    }

    /// Sets the locator, dropping it when empty.
    pub fn with_locator(mut self, locator: ChunkLocator) -> Self {
        self.locator = (!locator.is_empty()).then_some(locator);
        self
    }

    /// Short human-readable reference, e.g. `paper.pdf p.3 §2.1`.
    pub fn reference(&self) -> String {
        let mut reference = self.source.clone();
        if let Some(locator) = &self.locator {
            if let Some(page) = locator.page {
                reference.push_str(&format!(" p.{page}"));
            }
            if let Some(section) = &locator.section {
                reference.push_str(&format!(" §{section}"));
            }
            if let (Some(index), Some(total)) = (locator.chunk_index, locator.total_chunks) {
                reference.push_str(&format!(" (chunk {}/{total})", index + 1));
            }
        }
        reference
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_includes_locator() {
        let chunk = DocumentChunk::new("1", "text", "menter1994.pdf", 0.9).with_locator(
            ChunkLocator {
                page: Some(3),
                section: Some("2.1".into()),
                ..Default::default()
            },
        );
        assert_eq!(chunk.reference(), "menter1994.pdf p.3 §2.1");
    }

    #[test]
    fn empty_locator_is_dropped() {
        let chunk = DocumentChunk::new("1", "text", "a.pdf", 0.5).with_locator(ChunkLocator::default());
        assert!(chunk.locator.is_none());
        assert_eq!(chunk.reference(), "a.pdf");
    }
}

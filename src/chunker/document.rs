use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::splitter::TextSplitter;

/// A source text with caller-supplied metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Document {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: Map::new(),
        }
    }

    /// Attach a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A chunk of text ready for embedding/indexing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Stable hex SHA-256 id, usable as a vector store key
    pub id: String,
    /// The text content of this chunk
    pub text: String,
    /// Metadata about the chunk
    pub metadata: ChunkMetadata,
}

/// Metadata for a chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Position among the chunks of its document
    pub index: usize,
    /// Position of the source document in the batch
    pub document_index: usize,
    /// Byte offset in the source text (start), when the chunk could be located
    pub start_offset: Option<usize>,
    /// Byte offset in the source text (end)
    pub end_offset: Option<usize>,
    /// Length in chars
    pub char_count: usize,
    /// Metadata copied from the source document
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub document: Map<String, Value>,
}

impl TextSplitter {
    /// Split one text into [`Chunk`] records with offsets and ids
    pub fn create_chunks(&self, text: &str) -> Vec<Chunk> {
        self.chunk_document(0, text, &Map::new())
    }

    /// Split one document that sits at `document_index` in a larger batch
    pub fn split_document(&self, document_index: usize, document: &Document) -> Vec<Chunk> {
        self.chunk_document(document_index, &document.content, &document.metadata)
    }

    /// Split a batch of documents, carrying each document's metadata onto its chunks
    pub fn split_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        documents
            .iter()
            .enumerate()
            .flat_map(|(i, doc)| self.split_document(i, doc))
            .collect()
    }

    fn chunk_document(
        &self,
        document_index: usize,
        text: &str,
        metadata: &Map<String, Value>,
    ) -> Vec<Chunk> {
        let spans = self.split_spans(text);

        debug!(
            document_index,
            text_len = text.len(),
            chunks = spans.len(),
            "Split document"
        );

        spans
            .into_iter()
            .enumerate()
            .map(|(index, span)| Chunk {
                id: chunk_id(document_index, index, span.start, &span.text),
                metadata: ChunkMetadata {
                    index,
                    document_index,
                    start_offset: span.start,
                    end_offset: span.start.map(|s| s + span.text.len()),
                    char_count: span.text.chars().count(),
                    document: metadata.clone(),
                },
                text: span.text,
            })
            .collect()
    }
}

/// Hex SHA-256 over the document index, the chunk's start offset and its text.
///
/// Chunks that could not be located are keyed by their position instead.
fn chunk_id(document_index: usize, index: usize, start: Option<usize>, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(document_index.to_le_bytes());
    match start {
        Some(offset) => {
            hasher.update(b"offset");
            hasher.update(offset.to_le_bytes());
        }
        None => {
            hasher.update(b"index");
            hasher.update(index.to_le_bytes());
        }
    }
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_id_is_stable() {
        assert_eq!(chunk_id(0, 1, Some(5), "text"), chunk_id(0, 1, Some(5), "text"));
        assert_ne!(chunk_id(0, 1, Some(5), "text"), chunk_id(0, 1, Some(9), "text"));
        assert_eq!(chunk_id(3, 4, None, "x").len(), 64);
    }

    #[test]
    fn test_chunk_id_keyed_by_offset() {
        // Same text and offset, different position: same id
        assert_eq!(chunk_id(0, 1, Some(5), "text"), chunk_id(0, 2, Some(5), "text"));
        // Unlocated chunks fall back to their position
        assert_ne!(chunk_id(0, 1, None, "text"), chunk_id(0, 2, None, "text"));
        assert_ne!(chunk_id(0, 5, None, "text"), chunk_id(0, 1, Some(5), "text"));
    }

    #[test]
    fn test_document_metadata() {
        let doc = Document::new("body").with_metadata("source", "https://example.com");
        assert_eq!(doc.metadata["source"], "https://example.com");
    }
}

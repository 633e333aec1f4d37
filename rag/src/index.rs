//! In-memory vector index: chunked nodes, their embedding vectors, and
//! the fitted embedding model that produced them. Built once at startup
//! and read-only afterwards.

use log::{debug, info};
use rayon::prelude::*;
use uuid::Uuid;

use crate::embedding::{cosine_similarity, EmbeddingModel, TfIdfEmbedding};
use crate::error::{RagError, Result};
use crate::models::{Document, Node, SourceNode};
use crate::splitter::SentenceSplitter;

pub struct VectorIndex {
    nodes: Vec<Node>,
    vectors: Vec<Vec<f32>>,
    embedding: TfIdfEmbedding,
}

impl VectorIndex {
    /// Chunks the documents, fits the embedding model over all chunk
    /// texts, and embeds every node.
    ///
    /// An empty document set or one that yields no chunks is surfaced as
    /// an indexing error rather than silently producing an index that can
    /// never answer anything.
    pub fn from_documents(documents: &[Document], splitter: &SentenceSplitter) -> Result<Self> {
        if documents.is_empty() {
            return Err(RagError::Indexing(
                "no documents to index; the documents directory has no readable files".to_string(),
            ));
        }

        let mut nodes = Vec::new();
        for document in documents {
            for chunk in splitter.split(&document.text) {
                nodes.push(Node {
                    id: Uuid::new_v4().to_string(),
                    text: chunk,
                    metadata: document.metadata.clone(),
                });
            }
        }

        if nodes.is_empty() {
            return Err(RagError::Indexing(
                "documents contained no usable text after chunking".to_string(),
            ));
        }

        let embedding = TfIdfEmbedding::fit(nodes.iter().map(|n| n.text.as_str()))?;
        let vectors: Vec<Vec<f32>> = nodes
            .par_iter()
            .map(|node| embedding.embed(&node.text))
            .collect();

        info!(
            "Indexed {} nodes from {} documents",
            nodes.len(),
            documents.len()
        );

        Ok(Self {
            nodes,
            vectors,
            embedding,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns up to `top_k` nodes by cosine similarity, best first.
    ///
    /// The query is embedded with the same fitted model as the corpus.
    /// Nodes with non-positive or non-finite scores are dropped, so a
    /// query sharing no vocabulary with the corpus retrieves nothing.
    pub fn retrieve(&self, query: &str, top_k: usize) -> Vec<SourceNode> {
        let query_vector = self.embedding.embed(query);

        let mut scored: Vec<SourceNode> = self
            .nodes
            .iter()
            .zip(self.vectors.iter())
            .map(|(node, vector)| SourceNode {
                node: node.clone(),
                score: cosine_similarity(&query_vector, vector),
            })
            .filter(|source| source.score.is_finite() && source.score > 0.0)
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k);

        debug!("Retrieved {} nodes", scored.len());
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Metadata, FILE_NAME_KEY, PAGE_LABEL_KEY};

    fn page(file: &str, label: &str, text: &str) -> Document {
        let mut metadata = Metadata::new();
        metadata.insert(FILE_NAME_KEY.to_string(), file.to_string());
        metadata.insert(PAGE_LABEL_KEY.to_string(), label.to_string());
        Document::new(text, metadata)
    }

    fn fixture() -> Vec<Document> {
        vec![
            page(
                "report.pdf",
                "1",
                "The annual budget grew by ten percent. Spending on tooling stayed flat.",
            ),
            page(
                "report.pdf",
                "2",
                "The summary covers revenue, churn and headcount. The summary is final.",
            ),
            page(
                "manual.pdf",
                "1",
                "Press the red button to restart the pump. Wear gloves while servicing.",
            ),
        ]
    }

    #[test]
    fn empty_document_set_is_an_indexing_error() {
        let result = VectorIndex::from_documents(&[], &SentenceSplitter::default());
        assert!(matches!(result, Err(RagError::Indexing(_))));
    }

    #[test]
    fn documents_without_usable_text_are_an_indexing_error() {
        let documents = vec![Document::new("   \n\t ", Metadata::new())];
        let result = VectorIndex::from_documents(&documents, &SentenceSplitter::default());
        assert!(matches!(result, Err(RagError::Indexing(_))));
    }

    #[test]
    fn nodes_inherit_their_document_metadata() {
        let index = VectorIndex::from_documents(&fixture(), &SentenceSplitter::default()).unwrap();
        let retrieved = index.retrieve("what does the summary cover", 1);
        assert_eq!(retrieved.len(), 1);
        assert_eq!(retrieved[0].file_name(), "report.pdf");
        assert_eq!(retrieved[0].page_label(), "2");
    }

    #[test]
    fn retrieval_is_ordered_by_descending_score() {
        let index = VectorIndex::from_documents(&fixture(), &SentenceSplitter::default()).unwrap();
        let retrieved = index.retrieve("budget spending tooling", 3);
        assert!(!retrieved.is_empty());
        for pair in retrieved.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert_eq!(retrieved[0].page_label(), "1");
        assert_eq!(retrieved[0].file_name(), "report.pdf");
    }

    #[test]
    fn top_k_bounds_the_result_count() {
        let index = VectorIndex::from_documents(&fixture(), &SentenceSplitter::default()).unwrap();
        let retrieved = index.retrieve("the summary budget pump", 2);
        assert!(retrieved.len() <= 2);
    }

    #[test]
    fn unrelated_queries_retrieve_nothing() {
        let index = VectorIndex::from_documents(&fixture(), &SentenceSplitter::default()).unwrap();
        let retrieved = index.retrieve("zeppelin xylophone quasar", 5);
        assert!(retrieved.is_empty());
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Key/value metadata attached to documents and inherited by their nodes.
pub type Metadata = BTreeMap<String, String>;

pub const FILE_NAME_KEY: &str = "file_name";
pub const PAGE_LABEL_KEY: &str = "page_label";

/// One loaded source unit: a text file, or a single page of a PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    pub metadata: Metadata,
}

impl Document {
    pub fn new(text: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            metadata,
        }
    }
}

/// A bounded-size slice of a document's text, the atomic unit of retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub text: String,
    pub metadata: Metadata,
}

/// A retrieved node together with its similarity score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceNode {
    pub node: Node,
    pub score: f32,
}

impl SourceNode {
    pub fn file_name(&self) -> &str {
        self.node
            .metadata
            .get(FILE_NAME_KEY)
            .map(String::as_str)
            .unwrap_or("Unknown File")
    }

    pub fn page_label(&self) -> &str {
        self.node
            .metadata
            .get(PAGE_LABEL_KEY)
            .map(String::as_str)
            .unwrap_or("N/A")
    }
}

/// Result of one query: the synthesized answer plus the source nodes that
/// were actually packed into the prompt, in retrieval order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub answer: String,
    pub source_nodes: Vec<SourceNode>,
}

pub mod document_loader;
pub mod embedding;
pub mod error;
pub mod gemini_service;
pub mod index;
pub mod models;
pub mod query_engine;
pub mod splitter;

pub use document_loader::{DirectoryLoader, DocumentParser, PdfParser, TextParser};
pub use embedding::{EmbeddingModel, TfIdfEmbedding};
pub use error::{RagError, Result};
pub use gemini_service::{CompletionModel, GeminiService};
pub use index::VectorIndex;
pub use models::{Document, Metadata, Node, Response, SourceNode};
pub use query_engine::{QueryEngine, ResponseMode};
pub use splitter::SentenceSplitter;

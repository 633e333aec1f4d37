//! Error taxonomy for the pipeline.
//!
//! Setup and indexing failures happen before the chat session starts and
//! are fatal there; query failures are per-turn values the session reports
//! and absorbs.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RagError {
    /// Recoverable-by-user startup problem. The session never starts.
    #[error("setup error: {0}")]
    Setup(String),

    /// The document set could not be turned into a usable index.
    #[error("indexing error: {0}")]
    Indexing(String),

    /// The LLM call for a single question failed. Non-fatal to the session.
    #[error("query failed: {0}")]
    Query(#[source] anyhow::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RagError>;

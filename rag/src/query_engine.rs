//! Retrieval + synthesis: embed the question, pull the best-matching
//! nodes from the index, pack them into a single grounded prompt, and ask
//! the LLM once.

use log::debug;
use tiktoken_rs::{cl100k_base, CoreBPE};

use crate::error::{RagError, Result};
use crate::gemini_service::CompletionModel;
use crate::index::VectorIndex;
use crate::models::{Response, SourceNode};

const DEFAULT_TOP_K: usize = 5;
const DEFAULT_CONTEXT_TOKENS: usize = 3000;

/// How retrieved context is turned into LLM calls. Compact packs all
/// context that fits the token budget into a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    Compact,
}

pub struct QueryEngine<L: CompletionModel> {
    index: VectorIndex,
    llm: L,
    mode: ResponseMode,
    top_k: usize,
    max_context_tokens: usize,
    tokenizer: CoreBPE,
}

impl<L: CompletionModel> QueryEngine<L> {
    pub fn new(index: VectorIndex, llm: L, mode: ResponseMode) -> Result<Self> {
        let tokenizer = cl100k_base()
            .map_err(|e| RagError::Setup(format!("failed to load tokenizer: {e}")))?;
        Ok(Self {
            index,
            llm,
            mode,
            top_k: DEFAULT_TOP_K,
            max_context_tokens: DEFAULT_CONTEXT_TOKENS,
            tokenizer,
        })
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_context_budget(mut self, max_context_tokens: usize) -> Self {
        self.max_context_tokens = max_context_tokens;
        self
    }

    pub fn llm(&self) -> &L {
        &self.llm
    }

    /// Answers one question. The LLM is called exactly once; a failed
    /// call surfaces as a query error carrying the cause.
    pub async fn answer(&self, question: &str) -> Result<Response> {
        let retrieved = self.index.retrieve(question, self.top_k);

        let (context, packed) = match self.mode {
            ResponseMode::Compact => self.pack_context(retrieved),
        };
        let prompt = build_prompt(question, &context);
        debug!(
            "Synthesizing answer from {} source node(s), prompt is {} tokens",
            packed.len(),
            self.tokenizer.encode_with_special_tokens(&prompt).len()
        );

        let answer = self
            .llm
            .complete(&prompt)
            .await
            .map_err(RagError::Query)?;

        Ok(Response {
            answer,
            source_nodes: packed,
        })
    }

    /// Concatenates retrieved node texts in retrieval order, stopping
    /// before the token budget is exceeded. Nodes that do not fit are
    /// dropped from the prompt and from the reported sources alike.
    fn pack_context(&self, retrieved: Vec<SourceNode>) -> (String, Vec<SourceNode>) {
        let mut context = String::new();
        let mut packed = Vec::new();
        let mut used_tokens = 0usize;

        for source in retrieved {
            let block = format!(
                "Document: {}, Page: {}\nContent: {}\n\n",
                source.file_name(),
                source.page_label(),
                source.node.text
            );
            let block_tokens = self.tokenizer.encode_with_special_tokens(&block).len();
            if used_tokens + block_tokens > self.max_context_tokens {
                debug!("Context budget reached, dropping remaining nodes");
                break;
            }
            used_tokens += block_tokens;
            context.push_str(&block);
            packed.push(source);
        }

        (context, packed)
    }
}

fn build_prompt(question: &str, context: &str) -> String {
    format!(
        r#"You are an expert assistant that answers questions based solely on the provided context documents.

INSTRUCTIONS:
1. Answer the question using ONLY the information from the provided context
2. Be concise but comprehensive
3. If you quote or reference specific information, indicate which document it came from
4. If the context doesn't contain enough information to answer the question, say so clearly
5. Do not add information not present in the context
6. Focus on accuracy and relevance

CONTEXT DOCUMENTS:
{context}

QUESTION: {question}

ANSWER (be specific and cite sources):"#
    )
}

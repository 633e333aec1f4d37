//! Local embedding model: a corpus-fitted TF-IDF vectorizer.
//!
//! Fitting and embedding are deterministic for a given corpus, so query
//! vectors produced after startup live in the same space as the corpus
//! vectors produced during indexing.

use std::collections::{HashMap, HashSet};

use crate::error::{RagError, Result};

/// Text to fixed-size vector. Query-time embedding must use the same
/// fitted instance that embedded the corpus.
pub trait EmbeddingModel: Send + Sync {
    fn embed(&self, text: &str) -> Vec<f32>;
    fn dimension(&self) -> usize;
}

const MAX_VOCABULARY: usize = 1000;
const MIN_DIMENSION: usize = 100;

#[derive(Debug, Clone)]
pub struct TfIdfEmbedding {
    vocabulary: HashMap<String, usize>,
    idf: HashMap<String, f32>,
    dimension: usize,
}

impl TfIdfEmbedding {
    /// Builds the vocabulary and IDF table from the corpus of chunk texts.
    pub fn fit<'a, I>(corpus: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut term_counts: HashMap<String, usize> = HashMap::new();
        let mut chunk_frequencies: HashMap<String, usize> = HashMap::new();
        let mut total_chunks = 0usize;

        for text in corpus {
            total_chunks += 1;
            let terms = tokenize(text);
            let unique: HashSet<&String> = terms.iter().collect();
            for term in &terms {
                *term_counts.entry(term.clone()).or_insert(0) += 1;
            }
            for term in unique {
                *chunk_frequencies.entry(term.clone()).or_insert(0) += 1;
            }
        }

        if total_chunks == 0 {
            return Err(RagError::Indexing(
                "cannot fit an embedding model on an empty corpus".to_string(),
            ));
        }

        let idf: HashMap<String, f32> = chunk_frequencies
            .iter()
            .map(|(term, df)| {
                let idf = (total_chunks as f32 / *df as f32).ln();
                (term.clone(), idf)
            })
            .collect();

        // Frequency-ranked vocabulary; lexicographic tie-break keeps
        // fitting independent of hash iteration order.
        let mut ranked: Vec<(String, usize)> = term_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let vocabulary: HashMap<String, usize> = ranked
            .into_iter()
            .take(MAX_VOCABULARY)
            .enumerate()
            .map(|(idx, (term, _))| (term, idx))
            .collect();

        let dimension = vocabulary.len().max(MIN_DIMENSION);

        Ok(Self {
            vocabulary,
            idf,
            dimension,
        })
    }
}

impl EmbeddingModel for TfIdfEmbedding {
    fn embed(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0; self.dimension];
        let terms = tokenize(text);
        if terms.is_empty() {
            return embedding;
        }
        let total_terms = terms.len() as f32;

        for (term, count) in count_terms(&terms) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                let tf = count as f32 / total_terms;
                let idf = self.idf.get(&term).copied().unwrap_or(1.0);
                embedding[idx] = tf * idf;
            }
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in embedding.iter_mut() {
                *value /= norm;
            }
        }

        embedding
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
        })
        .filter(|word| word.len() > 2)
        .collect()
}

fn count_terms(terms: &[String]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for term in terms {
        *counts.entry(term.clone()).or_insert(0) += 1;
    }
    counts
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let len = a.len().min(b.len());

    let dot: f32 = a[..len].iter().zip(b[..len].iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a[..len].iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b[..len].iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

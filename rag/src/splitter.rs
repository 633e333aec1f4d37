use regex::Regex;

/// Splits document text into sentence-aligned chunks with a character
/// budget and a trailing overlap carried into the next chunk.
///
/// Deterministic for a given configuration and input text.
pub struct SentenceSplitter {
    chunk_size: usize,
    overlap: usize,
    whitespace: Regex,
    non_text: Regex,
    sentence_end: Regex,
}

impl SentenceSplitter {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
            whitespace: Regex::new(r"\s+").expect("valid regex"),
            non_text: Regex::new(r"[^\w\s.,!?;:()\-\[\]{}]").expect("valid regex"),
            sentence_end: Regex::new(r"[.!?]+\s+").expect("valid regex"),
        }
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let cleaned = self.clean(text);
        if cleaned.is_empty() {
            return chunks;
        }

        let mut current = String::new();
        for sentence in self.sentence_end.split(&cleaned) {
            let sentence = sentence.trim();
            if sentence.is_empty() {
                continue;
            }

            if current.chars().count() + sentence.chars().count() > self.chunk_size
                && !current.is_empty()
            {
                chunks.push(current.trim().to_string());

                // Carry the tail of the flushed chunk into the next one.
                let carried = if current.chars().count() > self.overlap {
                    current
                        .chars()
                        .skip(current.chars().count() - self.overlap)
                        .collect::<String>()
                } else {
                    current.clone()
                };
                current = carried + " " + sentence;
            } else {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(sentence);
            }
        }

        if !current.trim().is_empty() {
            chunks.push(current.trim().to_string());
        }

        chunks
    }

    fn clean(&self, text: &str) -> String {
        let cleaned = self.non_text.replace_all(text, " ");
        let cleaned = self.whitespace.replace_all(&cleaned, " ");
        cleaned.trim().to_string()
    }
}

impl Default for SentenceSplitter {
    fn default() -> Self {
        Self::new(500, 50)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_whitespace_input_yield_no_chunks() {
        let splitter = SentenceSplitter::default();
        assert!(splitter.split("").is_empty());
        assert!(splitter.split("   \n\t  ").is_empty());
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let splitter = SentenceSplitter::default();
        let chunks = splitter.split("One sentence. Another one.");
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].contains("One sentence"));
        assert!(chunks[0].contains("Another one"));
    }

    #[test]
    fn long_text_respects_the_chunk_budget() {
        let splitter = SentenceSplitter::new(100, 20);
        let text = "The quick brown fox jumps. ".repeat(40);
        let chunks = splitter.split(&text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 100, "oversized chunk: {chunk}");
        }
    }

    #[test]
    fn consecutive_chunks_share_overlap_text() {
        let splitter = SentenceSplitter::new(100, 20);
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(20);
        let chunks = splitter.split(&text);
        assert!(chunks.len() > 1);
        let tail: String = chunks[0]
            .chars()
            .skip(chunks[0].chars().count().saturating_sub(10))
            .collect();
        assert!(chunks[1].contains(tail.trim()));
    }

    #[test]
    fn splitting_is_deterministic() {
        let splitter = SentenceSplitter::new(80, 10);
        let text = "Alpha beta gamma. Delta epsilon zeta. Eta theta iota. ".repeat(10);
        assert_eq!(splitter.split(&text), splitter.split(&text));
    }

    #[test]
    fn control_glyphs_are_stripped() {
        let splitter = SentenceSplitter::default();
        let chunks = splitter.split("Plain text\u{00a9} with\u{2022} noise.");
        assert_eq!(chunks.len(), 1);
        assert!(!chunks[0].contains('\u{00a9}'));
        assert!(!chunks[0].contains('\u{2022}'));
    }
}

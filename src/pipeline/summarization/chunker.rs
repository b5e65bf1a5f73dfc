use super::DEFAULT_CHUNK_SIZE;

/// Splits text into bounded pieces for a length-limited model.
pub trait Chunker: Send + Sync {
    fn chunk(&self, text: &str) -> Vec<String>;
}

/// Greedy word packing under a character budget.
///
/// Each word costs its length in characters plus one separator. Words are
/// never split: a single word over budget becomes its own chunk.
#[derive(Debug, Clone, Copy)]
pub struct WordBudgetChunker {
    max_chunk_size: usize,
}

impl WordBudgetChunker {
    pub fn new(max_chunk_size: usize) -> Self {
        Self {
            max_chunk_size: max_chunk_size.max(1),
        }
    }

    pub fn max_chunk_size(&self) -> usize {
        self.max_chunk_size
    }
}

impl Default for WordBudgetChunker {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl Chunker for WordBudgetChunker {
    fn chunk(&self, text: &str) -> Vec<String> {
        chunk_text(text, self.max_chunk_size)
    }
}

/// Split `text` into chunks of consecutive words whose summed
/// `chars + 1` cost stays within `max_chunk_size`.
pub fn chunk_text(text: &str, max_chunk_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let cost = word.chars().count() + 1;
        if !current.is_empty() && current_len + cost > max_chunk_size {
            chunks.push(current.join(" "));
            current.clear();
            current_len = 0;
        }
        current.push(word);
        current_len += cost;
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    tracing::debug!(
        chunk_count = chunks.len(),
        max_chunk_size,
        "Text chunked"
    );
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cost(chunk: &str) -> usize {
        chunk.split(' ').map(|w| w.chars().count() + 1).sum()
    }

    #[test]
    fn packs_words_under_budget() {
        assert_eq!(chunk_text("ab cd efgh ij", 10), vec!["ab cd", "efgh ij"]);
    }

    #[test]
    fn empty_input_gives_no_chunks() {
        assert!(chunk_text("", 10).is_empty());
        assert!(chunk_text("   \n ", 10).is_empty());
    }

    #[test]
    fn oversized_word_gets_its_own_chunk() {
        let chunks = chunk_text("ok supercalifragilistic ok", 8);
        assert_eq!(chunks, vec!["ok", "supercalifragilistic", "ok"]);
    }

    #[test]
    fn rejoined_chunks_equal_normalized_input() {
        let text = "Patient presents with substernal chest pain\nradiating to the left arm,\t\
                    associated with diaphoresis and nausea. BP 140/90 mmHg, HR 95 bpm.";
        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
        for budget in [1, 5, 12, 40, 1000] {
            let chunks = chunk_text(text, budget);
            assert_eq!(chunks.join(" "), normalized, "budget {budget}");
            for chunk in &chunks {
                let single_word = !chunk.contains(' ');
                assert!(single_word || cost(chunk) <= budget, "{chunk:?} over {budget}");
            }
        }
    }

    #[test]
    fn budget_counts_characters_not_bytes() {
        // "éé" is 2 chars (4 bytes): cost 3 each, two fit in 6.
        assert_eq!(chunk_text("éé éé éé", 6), vec!["éé éé", "éé"]);
    }

    #[test]
    fn default_chunker_uses_default_budget() {
        let chunker = WordBudgetChunker::default();
        assert_eq!(chunker.max_chunk_size(), 1000);
        assert_eq!(chunker.chunk("one two"), vec!["one two"]);
    }

    #[test]
    fn zero_budget_is_clamped() {
        let chunker = WordBudgetChunker::new(0);
        assert_eq!(chunker.chunk("a b"), vec!["a", "b"]);
    }
}

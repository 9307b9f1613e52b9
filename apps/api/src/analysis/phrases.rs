//! Fallback phrase extraction — surfaces candidate phrases when no keyword matched.
//!
//! Informational only: candidates become display "skills" but never rank a field.

use std::collections::BTreeSet;

use crate::analysis::normalizer::{is_stopword, NormalizedText};

/// Harvests candidate phrases from a document. Swap implementations at startup.
pub trait PhraseExtractor: Send + Sync {
    fn extract(&self, text: &NormalizedText) -> Vec<String>;
}

/// Lightweight noun-chunk approximation with no model behind it.
///
/// Algorithm:
/// 1. Split the text into segments at every character that is neither alphabetic
///    nor whitespace (punctuation and digits end a chunk)
/// 2. Inside a segment, stopwords end a chunk; each run of content words is a chunk
/// 3. Runs longer than `max_words` are cut into consecutive `max_words` windows
/// 4. Drop chunks of ≤2 characters, de-duplicate, sort, keep the first `limit`
pub struct ChunkPhraseExtractor {
    max_words: usize,
    limit: usize,
}

impl ChunkPhraseExtractor {
    pub const DEFAULT_MAX_WORDS: usize = 3;

    pub fn new(limit: usize) -> Self {
        Self {
            max_words: Self::DEFAULT_MAX_WORDS,
            limit,
        }
    }
}

impl PhraseExtractor for ChunkPhraseExtractor {
    fn extract(&self, text: &NormalizedText) -> Vec<String> {
        let mut candidates = BTreeSet::new();

        for segment in text
            .as_str()
            .split(|c: char| !c.is_alphabetic() && !c.is_whitespace())
        {
            let mut run: Vec<&str> = Vec::new();
            for word in segment.split_whitespace().chain(std::iter::once("")) {
                if word.is_empty() || is_stopword(word) {
                    for window in run.chunks(self.max_words.max(1)) {
                        let phrase = window.join(" ");
                        if phrase.chars().count() > 2 && !is_stopword(&phrase) {
                            candidates.insert(phrase);
                        }
                    }
                    run.clear();
                } else {
                    run.push(word);
                }
            }
        }

        candidates.into_iter().take(self.limit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::normalizer::normalize;

    fn extract(text: &str) -> Vec<String> {
        ChunkPhraseExtractor::new(20).extract(&normalize(text))
    }

    #[test]
    fn test_stopwords_and_punctuation_split_chunks() {
        let phrases = extract("Managed the warehouse inventory and the delivery schedule.");
        assert_eq!(phrases, vec!["delivery schedule", "managed", "warehouse inventory"]);
    }

    #[test]
    fn test_long_runs_are_windowed() {
        let phrases = extract("senior warehouse forklift operator");
        assert_eq!(phrases, vec!["operator", "senior warehouse forklift"]);
    }

    #[test]
    fn test_short_chunks_dropped() {
        let phrases = extract("Go, ok; forklift");
        assert_eq!(phrases, vec!["forklift"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let phrases = extract("Forklift. forklift! FORKLIFT");
        assert_eq!(phrases, vec!["forklift"]);
    }

    #[test]
    fn test_limit_caps_output() {
        let phrases = ChunkPhraseExtractor::new(2)
            .extract(&normalize("alpha. bravo. charlie. delta."));
        assert_eq!(phrases, vec!["alpha", "bravo"]);
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        assert!(extract("").is_empty());
        assert!(extract("the and of").is_empty());
    }
}

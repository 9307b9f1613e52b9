//! Text normalization — lower-casing, line-break collapsing and stopword-filtered tokens.
//!
//! Pure functions. Empty input yields empty output; nothing here can fail.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// English stopword set (the NLTK `english` list).
const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

static STOPWORD_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| STOPWORDS.iter().copied().collect());

// A whitespace run is collapsed only when it contains a line break or tab.
static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*[\r\n\t]\s*").unwrap());

/// Normalized text of one résumé plus its derived token sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    text: String,
    tokens: Vec<String>,
}

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Alphabetic, stopword-free tokens in document order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Lower-cases `raw`, collapses line-break/tab runs to single spaces and tokenizes.
pub fn normalize(raw: &str) -> NormalizedText {
    let text = normalize_text(raw);
    let tokens = tokenize(&text);
    NormalizedText { text, tokens }
}

pub fn normalize_text(raw: &str) -> String {
    let lower = raw.to_lowercase();
    LINE_BREAKS.replace_all(&lower, " ").into_owned()
}

/// Splits on non-alphabetic boundaries and drops stopwords.
pub fn tokenize(normalized: &str) -> Vec<String> {
    normalized
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| !w.is_empty() && !is_stopword(w))
        .map(str::to_owned)
        .collect()
}

pub fn is_stopword(word: &str) -> bool {
    STOPWORD_SET.contains(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_collapses_line_breaks() {
        let n = normalize("Machine\nLearning\r\n\tand  SQL");
        assert_eq!(n.as_str(), "machine learning and  sql");
    }

    #[test]
    fn test_line_break_run_with_spaces_becomes_one_space() {
        assert_eq!(normalize_text("Data \n \n Visualization"), "data visualization");
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let n = normalize("");
        assert_eq!(n.as_str(), "");
        assert!(n.tokens().is_empty());
        assert!(n.is_empty());
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        assert!(normalize(" \n\t ").is_empty());
    }

    #[test]
    fn test_tokens_drop_stopwords_and_non_alphabetic() {
        let n = normalize("I used Python 3, SQL and C++ for the project.");
        assert_eq!(n.tokens(), &["used", "python", "sql", "c", "project"]);
    }

    #[test]
    fn test_tokens_split_inside_words_on_punctuation() {
        let n = normalize("node.js/react");
        assert_eq!(n.tokens(), &["node", "js", "react"]);
    }

    #[test]
    fn test_is_stopword() {
        assert!(is_stopword("the"));
        assert!(is_stopword("and"));
        assert!(!is_stopword("python"));
        assert!(!is_stopword("ui"));
    }
}

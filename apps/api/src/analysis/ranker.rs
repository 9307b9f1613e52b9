//! Field ranking — turns per-field keyword hits into an ordered field list.
//!
//! Score = number of DISTINCT keywords of a field found in the document. Raw
//! occurrence counts are display-only, so one repeated buzzword cannot carry a
//! field. Zero-score fields are omitted. Ties keep catalog declaration order.

use std::sync::Arc;

use serde::Serialize;

use crate::analysis::matcher::MatchResult;
use crate::analysis::normalizer::NormalizedText;
use crate::analysis::phrases::PhraseExtractor;

/// Reported as the top field whenever no field scored.
pub const UNDEFINED_FIELD: &str = "General / Undefined";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldScore {
    pub field: String,
    pub score: usize,
    /// Sorted ascending.
    pub matched_keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ranking {
    pub ordered: Vec<FieldScore>,
    pub top_field: Option<String>,
    pub fallback_used: bool,
    /// Fallback phrase candidates; empty unless `fallback_used`.
    pub candidates: Vec<String>,
}

impl Ranking {
    /// The top field, or `UNDEFINED_FIELD` when nothing ranked.
    pub fn top_field_name(&self) -> &str {
        self.top_field.as_deref().unwrap_or(UNDEFINED_FIELD)
    }
}

pub struct FieldRanker {
    fallback: Option<Arc<dyn PhraseExtractor>>,
}

impl FieldRanker {
    pub fn new(fallback: Option<Arc<dyn PhraseExtractor>>) -> Self {
        Self { fallback }
    }

    pub fn without_fallback() -> Self {
        Self { fallback: None }
    }

    /// Ranks fields. When nothing matched at all and a phrase extractor is
    /// configured, candidates are harvested from `text`; the top field stays
    /// undefined either way.
    pub fn rank(&self, result: &MatchResult, text: &NormalizedText) -> Ranking {
        let ordered = score_fields(result);
        let top_field = ordered.first().map(|s| s.field.clone());

        let (fallback_used, candidates) = match &self.fallback {
            Some(extractor) if result.is_empty() => (true, extractor.extract(text)),
            _ => (false, Vec::new()),
        };

        Ranking {
            ordered,
            top_field,
            fallback_used,
            candidates,
        }
    }
}

/// Distinct-keyword score per field, descending; `sort_by` is stable so equal
/// scores stay in the catalog order `field_matches` already carries.
pub fn score_fields(result: &MatchResult) -> Vec<FieldScore> {
    let mut scores: Vec<FieldScore> = result
        .field_matches
        .iter()
        .filter(|m| !m.keywords.is_empty())
        .map(|m| {
            let mut matched_keywords = m.keywords.clone();
            matched_keywords.sort();
            matched_keywords.dedup();
            FieldScore {
                field: m.field.clone(),
                score: matched_keywords.len(),
                matched_keywords,
            }
        })
        .collect();

    scores.sort_by(|a, b| b.score.cmp(&a.score));
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::catalog::KeywordCatalog;
    use crate::analysis::matcher::{FieldMatch, MatchEngine, MatchPolicy};
    use crate::analysis::normalizer::normalize;
    use crate::analysis::phrases::ChunkPhraseExtractor;

    fn engine() -> MatchEngine {
        let catalog = Arc::new(KeywordCatalog::builtin().unwrap());
        MatchEngine::new(catalog, MatchPolicy::WholeWord).unwrap()
    }

    fn rank(text: &str) -> Ranking {
        let normalized = normalize(text);
        let result = engine().find_matches(&normalized);
        FieldRanker::without_fallback().rank(&result, &normalized)
    }

    fn with_fallback() -> FieldRanker {
        FieldRanker::new(Some(Arc::new(ChunkPhraseExtractor::new(20))))
    }

    #[test]
    fn test_distinct_keywords_outrank_repeated_occurrences() {
        let ranking = rank("python python python sql html css react");
        let fields: Vec<(&str, usize)> = ranking
            .ordered
            .iter()
            .map(|s| (s.field.as_str(), s.score))
            .collect();
        assert_eq!(fields, vec![("Web Development", 3), ("Data Science", 2)]);
        assert_eq!(ranking.top_field.as_deref(), Some("Web Development"));
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let ranking = rank("html and python");
        let fields: Vec<&str> = ranking.ordered.iter().map(|s| s.field.as_str()).collect();
        assert_eq!(fields, vec!["Data Science", "Web Development"]);
    }

    #[test]
    fn test_single_occurrence_scores_one() {
        let ranking = rank("Handled payroll for 200 staff.");
        assert_eq!(ranking.ordered.len(), 1);
        assert_eq!(ranking.ordered[0].field, "Human Resources");
        assert_eq!(ranking.ordered[0].score, 1);
    }

    #[test]
    fn test_no_hits_yields_sentinel_and_empty_list() {
        let ranking = rank("Operated forklifts in a warehouse.");
        assert!(ranking.ordered.is_empty());
        assert_eq!(ranking.top_field, None);
        assert_eq!(ranking.top_field_name(), UNDEFINED_FIELD);
        assert!(!ranking.fallback_used);
    }

    #[test]
    fn test_fallback_supplies_candidates_but_no_field() {
        let normalized = normalize("Managed the warehouse inventory and the delivery schedule.");
        let result = engine().find_matches(&normalized);
        let ranking = with_fallback().rank(&result, &normalized);

        assert!(ranking.fallback_used);
        assert!(ranking.candidates.contains(&"warehouse inventory".to_string()));
        assert!(ranking.ordered.is_empty());
        assert_eq!(ranking.top_field_name(), UNDEFINED_FIELD);
    }

    #[test]
    fn test_fallback_not_used_when_keywords_match() {
        let normalized = normalize("SQL reporting");
        let result = engine().find_matches(&normalized);
        let ranking = with_fallback().rank(&result, &normalized);
        assert!(!ranking.fallback_used);
        assert!(ranking.candidates.is_empty());
    }

    #[test]
    fn test_matched_keywords_sorted_and_empty_fields_skipped() {
        let result = MatchResult {
            field_matches: vec![
                FieldMatch {
                    field: "A".to_string(),
                    keywords: vec!["zeta".to_string(), "alpha".to_string()],
                },
                FieldMatch {
                    field: "B".to_string(),
                    keywords: vec![],
                },
            ],
            ..MatchResult::default()
        };
        let scores = score_fields(&result);
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].matched_keywords, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let text = "Branding, SEO, Figma and UX for a social media launch.";
        assert_eq!(rank(text), rank(text));
    }
}

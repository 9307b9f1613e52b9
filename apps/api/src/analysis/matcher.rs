//! Match engine — finds catalog keywords in normalized text and counts them.
//!
//! Two policies sit behind the `KeywordCounter` trait:
//! - `WholeWord` (default): boundary-delimited regex per keyword, so "ui" never
//!   matches inside "building".
//! - `TokenMembership`: single words must equal a stopword-free token; anything
//!   containing a non-alphabetic character ("machine learning", "b2b sales") is
//!   counted by substring search on the normalized text instead.
//!
//! Counters are compiled once per distinct keyword when the engine is built.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::catalog::{CatalogError, KeywordCatalog};
use crate::analysis::normalizer::NormalizedText;

// ────────────────────────────────────────────────────────────────────────────
// Policy selection
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    #[default]
    WholeWord,
    TokenMembership,
}

impl MatchPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchPolicy::WholeWord => "whole_word",
            MatchPolicy::TokenMembership => "token_membership",
        }
    }
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "whole_word" | "whole-word" => Ok(MatchPolicy::WholeWord),
            "token_membership" | "token-membership" | "token" => Ok(MatchPolicy::TokenMembership),
            other => Err(format!(
                "unknown match policy '{other}' (expected whole_word or token_membership)"
            )),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Match output
// ────────────────────────────────────────────────────────────────────────────

/// Which of one field's keywords were found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMatch {
    pub field: String,
    /// Declaration order within the field.
    pub keywords: Vec<String>,
}

/// Everything the engine found in one document. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// Distinct matched keywords across all fields.
    pub keywords: BTreeSet<String>,
    /// Non-overlapping occurrence count per matched keyword.
    pub occurrences: BTreeMap<String, usize>,
    /// Fields with at least one hit, in catalog declaration order.
    pub field_matches: Vec<FieldMatch>,
}

impl MatchResult {
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Counter trait + the two policies
// ────────────────────────────────────────────────────────────────────────────

/// Counts occurrences of the keyword at `slot` (index into the engine's distinct
/// keyword list). Implement this to add a policy without touching the engine.
pub trait KeywordCounter: Send + Sync {
    fn policy(&self) -> MatchPolicy;
    fn count(&self, slot: usize, text: &NormalizedText) -> usize;
}

pub struct WholeWordCounter {
    patterns: Vec<Regex>,
}

impl WholeWordCounter {
    pub fn compile(keywords: &[String]) -> Result<Self, CatalogError> {
        let patterns = keywords
            .iter()
            .map(|kw| {
                Regex::new(&boundary_pattern(kw)).map_err(|source| CatalogError::Pattern {
                    keyword: kw.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }
}

impl KeywordCounter for WholeWordCounter {
    fn policy(&self) -> MatchPolicy {
        MatchPolicy::WholeWord
    }

    fn count(&self, slot: usize, text: &NormalizedText) -> usize {
        self.patterns[slot].find_iter(text.as_str()).count()
    }
}

/// `\b` is only asserted on edges that are word characters, otherwise
/// keywords like "c++" could never be followed by a space.
fn boundary_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 8);
    if keyword.chars().next().is_some_and(is_word_char) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&regex::escape(keyword));
    if keyword.chars().last().is_some_and(is_word_char) {
        pattern.push_str(r"\b");
    }
    pattern
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

enum KeywordShape {
    Word(String),
    Phrase(String),
}

pub struct TokenCounter {
    shapes: Vec<KeywordShape>,
}

impl TokenCounter {
    pub fn new(keywords: &[String]) -> Self {
        let shapes = keywords
            .iter()
            .map(|kw| {
                if kw.chars().all(char::is_alphabetic) {
                    KeywordShape::Word(kw.clone())
                } else {
                    KeywordShape::Phrase(kw.clone())
                }
            })
            .collect();
        Self { shapes }
    }
}

impl KeywordCounter for TokenCounter {
    fn policy(&self) -> MatchPolicy {
        MatchPolicy::TokenMembership
    }

    fn count(&self, slot: usize, text: &NormalizedText) -> usize {
        match &self.shapes[slot] {
            KeywordShape::Word(word) => text.tokens().iter().filter(|t| *t == word).count(),
            KeywordShape::Phrase(phrase) => text.as_str().matches(phrase.as_str()).count(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

/// Compiled matcher for one catalog under one policy. Shared read-only.
pub struct MatchEngine {
    catalog: Arc<KeywordCatalog>,
    keywords: Vec<String>,
    /// Per field (declaration order), slots of its keywords.
    field_slots: Vec<Vec<usize>>,
    counter: Box<dyn KeywordCounter>,
}

impl MatchEngine {
    pub fn new(catalog: Arc<KeywordCatalog>, policy: MatchPolicy) -> Result<Self, CatalogError> {
        let keywords: Vec<String> = catalog
            .distinct_keywords()
            .into_iter()
            .map(str::to_owned)
            .collect();

        let field_slots = catalog
            .fields()
            .iter()
            .map(|field| {
                field
                    .keywords
                    .iter()
                    .filter_map(|kw| keywords.iter().position(|k| k == kw))
                    .collect()
            })
            .collect();

        let counter: Box<dyn KeywordCounter> = match policy {
            MatchPolicy::WholeWord => Box::new(WholeWordCounter::compile(&keywords)?),
            MatchPolicy::TokenMembership => Box::new(TokenCounter::new(&keywords)),
        };

        Ok(Self {
            catalog,
            keywords,
            field_slots,
            counter,
        })
    }

    pub fn policy(&self) -> MatchPolicy {
        self.counter.policy()
    }

    pub fn catalog(&self) -> &KeywordCatalog {
        &self.catalog
    }

    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }

    /// Runs every keyword once against `text` and groups the hits by field.
    /// A keyword shared by several fields counts once toward each of them.
    pub fn find_matches(&self, text: &NormalizedText) -> MatchResult {
        if text.is_empty() {
            return MatchResult::default();
        }

        let counts: Vec<usize> = (0..self.keywords.len())
            .map(|slot| self.counter.count(slot, text))
            .collect();

        let mut result = MatchResult::default();
        for (keyword, &count) in self.keywords.iter().zip(&counts) {
            if count > 0 {
                result.keywords.insert(keyword.clone());
                result.occurrences.insert(keyword.clone(), count);
            }
        }

        for (field, slots) in self.catalog.fields().iter().zip(&self.field_slots) {
            let hits: Vec<String> = slots
                .iter()
                .filter(|&&slot| counts[slot] > 0)
                .map(|&slot| self.keywords[slot].clone())
                .collect();
            if !hits.is_empty() {
                result.field_matches.push(FieldMatch {
                    field: field.name.clone(),
                    keywords: hits,
                });
            }
        }

        result
    }
}

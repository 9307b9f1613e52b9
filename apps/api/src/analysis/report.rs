//! Report assembly — runs normalize → match → rank → recommend for one document.
//!
//! Performs no matching logic itself. An empty or whitespace-only document is a
//! legitimate outcome and yields `Report::empty`, never an error.

use serde::Serialize;
use tracing::debug;

use crate::analysis::matcher::{MatchEngine, MatchPolicy, MatchResult};
use crate::analysis::normalizer::normalize;
use crate::analysis::ranker::{FieldRanker, FieldScore, UNDEFINED_FIELD};
use crate::analysis::recommender::Recommender;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// Occurrence count of one detected skill, for frequency views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillCount {
    pub skill: String,
    pub count: usize,
}

/// Final analysis of one résumé. Plain data; rendering belongs to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Matched keywords, or fallback phrase candidates when `fallback_used`.
    pub skills: Vec<String>,
    pub ranked_fields: Vec<FieldScore>,
    pub top_field: String,
    pub fallback_used: bool,
    pub recommended_jobs: Vec<String>,
    pub recommended_courses: Vec<String>,
    /// Descending count, ties by skill name.
    pub skill_counts: Vec<SkillCount>,
    pub match_policy: MatchPolicy, // for transparency
    pub catalog_version: String,
}

impl Report {
    pub fn empty(match_policy: MatchPolicy, catalog_version: impl Into<String>) -> Self {
        Self {
            skills: vec![],
            ranked_fields: vec![],
            top_field: UNDEFINED_FIELD.to_string(),
            fallback_used: false,
            recommended_jobs: vec![],
            recommended_courses: vec![],
            skill_counts: vec![],
            match_policy,
            catalog_version: catalog_version.into(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Assembler
// ────────────────────────────────────────────────────────────────────────────

/// Built once at startup and shared by every request.
pub struct ReportAssembler {
    engine: MatchEngine,
    ranker: FieldRanker,
    recommender: Recommender,
}

impl ReportAssembler {
    pub fn new(engine: MatchEngine, ranker: FieldRanker, recommender: Recommender) -> Self {
        Self {
            engine,
            ranker,
            recommender,
        }
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    pub fn recommender(&self) -> &Recommender {
        &self.recommender
    }

    pub fn assemble(&self, document: &str) -> Report {
        let policy = self.engine.policy();
        let version = self.engine.catalog().version();

        if document.trim().is_empty() {
            debug!("Empty document — returning empty report");
            return Report::empty(policy, version);
        }

        let text = normalize(document);
        let result = self.engine.find_matches(&text);
        let ranking = self.ranker.rank(&result, &text);
        let recommendation = self.recommender.recommend(ranking.top_field_name());

        let skills = if ranking.fallback_used {
            ranking.candidates.clone()
        } else {
            result.keywords.iter().cloned().collect()
        };

        debug!(
            "Analyzed {} bytes: {} skills, {} fields, top='{}', fallback={}",
            document.len(),
            skills.len(),
            ranking.ordered.len(),
            ranking.top_field_name(),
            ranking.fallback_used
        );

        Report {
            skills,
            top_field: ranking.top_field_name().to_string(),
            ranked_fields: ranking.ordered,
            fallback_used: ranking.fallback_used,
            recommended_jobs: recommendation.jobs,
            recommended_courses: recommendation.courses,
            skill_counts: skill_counts(&result),
            match_policy: policy,
            catalog_version: version.to_string(),
        }
    }
}

fn skill_counts(result: &MatchResult) -> Vec<SkillCount> {
    let mut counts: Vec<SkillCount> = result
        .occurrences
        .iter()
        .map(|(skill, &count)| SkillCount {
            skill: skill.clone(),
            count,
        })
        .collect();
    // BTreeMap iteration is already name-ordered; the stable sort keeps it for ties
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

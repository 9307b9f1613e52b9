//! Recommender — static field → job titles / courses lookup.
//!
//! A miss (unknown field, or the undefined sentinel) is the valid
//! "no recommendation" state and returns empty lists.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::catalog::{CatalogError, KeywordCatalog};

const BUILTIN_RECOMMENDATIONS: &str = include_str!("../../data/recommendations.json");

/// At most this many titles and courses are returned per field.
pub const MAX_RECOMMENDATIONS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub jobs: Vec<String>,
    pub courses: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Recommender {
    table: HashMap<String, Recommendation>,
}

impl Recommender {
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(p) => {
                let raw = std::fs::read_to_string(p).map_err(|source| CatalogError::Io {
                    path: p.display().to_string(),
                    source,
                })?;
                Self::from_json(&raw)
            }
            None => Self::builtin(),
        }
    }

    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_RECOMMENDATIONS)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let table: HashMap<String, Recommendation> = serde_json::from_str(json)?;
        Ok(Self { table })
    }

    pub fn recommend(&self, field: &str) -> Recommendation {
        self.table
            .get(field)
            .map(|r| Recommendation {
                jobs: r.jobs.iter().take(MAX_RECOMMENDATIONS).cloned().collect(),
                courses: r.courses.iter().take(MAX_RECOMMENDATIONS).cloned().collect(),
            })
            .unwrap_or_default()
    }

    /// Catalog fields with no entry in the table (logged at startup).
    pub fn uncovered_fields<'a>(&self, catalog: &'a KeywordCatalog) -> Vec<&'a str> {
        catalog
            .fields()
            .iter()
            .map(|f| f.name.as_str())
            .filter(|name| !self.table.contains_key(*name))
            .collect()
    }
}

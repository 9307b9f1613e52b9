//! Keyword catalog — the static field → keyword table every analysis runs against.
//!
//! One versioned JSON asset (`data/catalog.json`) is embedded in the binary and can be
//! replaced at startup via `CATALOG_PATH`. It is validated once, wrapped in an `Arc`,
//! and never mutated afterwards.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

/// Failures while loading the catalog or recommendation assets.
/// Only possible at startup — analysis itself never fails.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed asset JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Field at position {0} has an empty name")]
    EmptyFieldName(usize),

    #[error("Field '{0}' is declared more than once")]
    DuplicateField(String),

    #[error("Field '{0}' has no keywords")]
    NoKeywords(String),

    #[error("Field '{0}' contains a blank keyword")]
    BlankKeyword(String),

    #[error("Keyword '{keyword}' cannot be compiled: {source}")]
    Pattern {
        keyword: String,
        #[source]
        source: regex::Error,
    },
}

/// A named job field and the keywords that signal it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    version: String,
    fields: Vec<Field>,
}

/// Validated, declaration-ordered field table.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordCatalog {
    version: String,
    fields: Vec<Field>,
}

impl KeywordCatalog {
    /// Loads `path` when given, otherwise the embedded default.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(p) => Self::from_path(p),
            None => Self::builtin(),
        }
    }

    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.version, file.fields)
    }

    /// Validates and canonicalizes `fields`:
    /// - names non-empty and unique (case-insensitive)
    /// - keywords trimmed, lower-cased, non-blank, de-duplicated within a field
    /// - every field keeps at least one keyword
    pub fn new(version: impl Into<String>, fields: Vec<Field>) -> Result<Self, CatalogError> {
        let mut seen_names = HashSet::new();
        let mut canonical = Vec::with_capacity(fields.len());

        for (position, field) in fields.into_iter().enumerate() {
            let name = field.name.trim().to_string();
            if name.is_empty() {
                return Err(CatalogError::EmptyFieldName(position));
            }
            if !seen_names.insert(name.to_lowercase()) {
                return Err(CatalogError::DuplicateField(name));
            }

            let mut seen_keywords = HashSet::new();
            let mut keywords = Vec::with_capacity(field.keywords.len());
            for keyword in field.keywords {
                let keyword = keyword.trim().to_lowercase();
                if keyword.is_empty() {
                    return Err(CatalogError::BlankKeyword(name));
                }
                if seen_keywords.insert(keyword.clone()) {
                    keywords.push(keyword);
                }
            }
            if keywords.is_empty() {
                return Err(CatalogError::NoKeywords(name));
            }

            canonical.push(Field { name, keywords });
        }

        Ok(Self {
            version: version.into(),
            fields: canonical,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Fields in declaration order. Ranking ties resolve in this order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Every keyword once, in first-declared order.
    pub fn distinct_keywords(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.fields
            .iter()
            .flat_map(|f| f.keywords.iter())
            .filter(|kw| seen.insert(kw.as_str()))
            .map(String::as_str)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

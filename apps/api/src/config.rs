use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};

use crate::analysis::matcher::MatchPolicy;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values abort startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub match_policy: MatchPolicy,
    /// Replacement keyword catalog; the embedded one is used when unset.
    pub catalog_path: Option<PathBuf>,
    pub recommendations_path: Option<PathBuf>,
    /// Harvest candidate phrases when no keyword matches.
    pub fallback_phrases: bool,
    pub fallback_limit: usize,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            match_policy: MatchPolicy::default(),
            catalog_path: None,
            recommendations_path: None,
            fallback_phrases: true,
            fallback_limit: 20,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup (the environment, or a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        Ok(Config {
            port: parse_or(&lookup, "PORT", defaults.port)?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            match_policy: match lookup("MATCH_POLICY") {
                Some(raw) => raw
                    .parse()
                    .map_err(|e: String| anyhow!(e))
                    .context("MATCH_POLICY is invalid")?,
                None => defaults.match_policy,
            },
            catalog_path: lookup("CATALOG_PATH").map(PathBuf::from),
            recommendations_path: lookup("RECOMMENDATIONS_PATH").map(PathBuf::from),
            fallback_phrases: parse_or(&lookup, "FALLBACK_PHRASES", defaults.fallback_phrases)?,
            fallback_limit: match parse_or(&lookup, "FALLBACK_LIMIT", defaults.fallback_limit)? {
                0 => bail!(
                    "FALLBACK_LIMIT must be at least 1 (set FALLBACK_PHRASES=false to disable)"
                ),
                limit => limit,
            },
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

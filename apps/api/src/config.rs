use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

use crate::eligibility::skills::SkillMatchMode;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// In-process cache when unset.
    pub redis_url: Option<String>,
    /// Scores older than this are recomputed on the next request.
    pub score_cache_ttl_hours: i64,
    /// Stored scores older than this are evicted. At least the TTL.
    pub score_retention_hours: i64,
    pub top_candidates_limit: usize,
    pub skill_match_mode: SkillMatchMode,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let skill_match_mode = match lookup("SKILL_MATCH_MODE") {
            Some(raw) => SkillMatchMode::parse(&raw).ok_or_else(|| {
                anyhow!("SKILL_MATCH_MODE must be 'substring' or 'exact', got '{raw}'")
            })?,
            None => SkillMatchMode::default(),
        };

        let score_cache_ttl_hours: i64 = parse_or(&lookup, "SCORE_CACHE_TTL_HOURS", 24)?;
        if score_cache_ttl_hours <= 0 {
            return Err(anyhow!("SCORE_CACHE_TTL_HOURS must be positive"));
        }

        let score_retention_hours: i64 = parse_or(&lookup, "SCORE_RETENTION_HOURS", 168)?;
        if score_retention_hours < score_cache_ttl_hours {
            return Err(anyhow!(
                "SCORE_RETENTION_HOURS ({score_retention_hours}) must be at least SCORE_CACHE_TTL_HOURS ({score_cache_ttl_hours})"
            ));
        }

        let top_candidates_limit: usize = parse_or(&lookup, "TOP_CANDIDATES_LIMIT", 20)?;
        if top_candidates_limit == 0 {
            return Err(anyhow!("TOP_CANDIDATES_LIMIT must be at least 1"));
        }

        Ok(Config {
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            redis_url: lookup("REDIS_URL").filter(|url| !url.trim().is_empty()),
            score_cache_ttl_hours,
            score_retention_hours,
            top_candidates_limit,
            skill_match_mode,
        })
    }

    pub fn score_cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.score_cache_ttl_hours)
    }

    pub fn score_retention(&self) -> chrono::Duration {
        chrono::Duration::hours(self.score_retention_hours)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
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

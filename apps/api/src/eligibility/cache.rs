//! Score cache: stores computed results keyed by (candidate_id, job_id).
//!
//! `AppState` holds an `Arc<dyn ScoreCache>`: Redis when `REDIS_URL` is set,
//! otherwise the in-process map. Two windows apply to an entry:
//! past the TTL it is stale and recomputed by the caller, past the retention
//! window it is evicted by the backend.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::score::ScoreResult;

/// Evaluator-set score that takes precedence over the computed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreOverride {
    pub score: u32,
    pub reason: Option<String>,
    pub overridden_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedScore {
    pub result: ScoreResult,
    pub calculated_at: DateTime<Utc>,
    #[serde(default)]
    pub recalculation_count: u32,
    #[serde(default)]
    pub last_recalculated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub score_override: Option<ScoreOverride>,
}

impl CachedScore {
    pub fn new(result: ScoreResult) -> Self {
        Self {
            result,
            calculated_at: Utc::now(),
            recalculation_count: 0,
            last_recalculated_at: None,
            score_override: None,
        }
    }

    /// Replaces the computed result in place. An override survives recalculation.
    pub fn recalculate(&mut self, result: ScoreResult) {
        let now = Utc::now();
        self.result = result;
        self.calculated_at = now;
        self.last_recalculated_at = Some(now);
        self.recalculation_count += 1;
    }

    pub fn apply_override(&mut self, score: u32, reason: Option<String>) {
        self.score_override = Some(ScoreOverride {
            score,
            reason,
            overridden_at: Utc::now(),
        });
    }

    /// The override when one is set, the computed overall score otherwise.
    pub fn effective_score(&self) -> u32 {
        self.score_override
            .as_ref()
            .map_or(self.result.overall_score, |o| o.score)
    }

    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.calculated_at < ttl
    }
}

#[async_trait]
pub trait ScoreCache: Send + Sync {
    async fn get(&self, candidate_id: Uuid, job_id: Uuid) -> Result<Option<CachedScore>, AppError>;

    async fn put(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
        entry: &CachedScore,
    ) -> Result<(), AppError>;

    /// Every retained entry for the job, in no particular order.
    async fn scores_for_job(&self, job_id: Uuid) -> Result<Vec<(Uuid, CachedScore)>, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// In-process backend
// ────────────────────────────────────────────────────────────────────────────

pub struct InMemoryScoreCache {
    entries: RwLock<HashMap<(Uuid, Uuid), CachedScore>>,
    retention: Duration,
}

impl InMemoryScoreCache {
    pub fn new(retention: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            retention,
        }
    }

    fn retained(&self, entry: &CachedScore, now: DateTime<Utc>) -> bool {
        entry.is_fresh(now, self.retention)
    }
}

#[async_trait]
impl ScoreCache for InMemoryScoreCache {
    async fn get(&self, candidate_id: Uuid, job_id: Uuid) -> Result<Option<CachedScore>, AppError> {
        let now = Utc::now();
        Ok(self
            .entries
            .read()
            .await
            .get(&(candidate_id, job_id))
            .filter(|entry| self.retained(entry, now))
            .cloned())
    }

    /// Evicts every entry past the retention window before inserting.
    async fn put(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
        entry: &CachedScore,
    ) -> Result<(), AppError> {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, existing| self.retained(existing, now));
        if self.retained(entry, now) {
            entries.insert((candidate_id, job_id), entry.clone());
        }
        Ok(())
    }

    async fn scores_for_job(&self, job_id: Uuid) -> Result<Vec<(Uuid, CachedScore)>, AppError> {
        let now = Utc::now();
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .filter(|((_, job), entry)| *job == job_id && self.retained(entry, now))
            .map(|((candidate_id, _), entry)| (*candidate_id, entry.clone()))
            .collect())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Redis backend
// ────────────────────────────────────────────────────────────────────────────

/// JSON values under `eligibility:score:{candidate_id}:{job_id}` plus a per-job
/// set of candidate ids under `eligibility:job:{job_id}`. Redis expires both
/// after the retention window.
pub struct RedisScoreCache {
    conn: redis::aio::MultiplexedConnection,
    retention_secs: u64,
}

impl RedisScoreCache {
    /// Opens the shared multiplexed connection; every call clones it.
    pub async fn connect(client: redis::Client, retention: Duration) -> Result<Self, AppError> {
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Cache(format!("connect failed: {e}")))?;
        Ok(Self {
            conn,
            retention_secs: retention_secs(retention),
        })
    }
}

fn retention_secs(retention: Duration) -> u64 {
    retention.num_seconds().max(1) as u64
}

fn cache_key(candidate_id: Uuid, job_id: Uuid) -> String {
    format!("eligibility:score:{candidate_id}:{job_id}")
}

fn job_index_key(job_id: Uuid) -> String {
    format!("eligibility:job:{job_id}")
}

fn decode(json: &str) -> Result<CachedScore, AppError> {
    serde_json::from_str(json).map_err(|e| AppError::Cache(format!("corrupt cache entry: {e}")))
}

#[async_trait]
impl ScoreCache for RedisScoreCache {
    async fn get(&self, candidate_id: Uuid, job_id: Uuid) -> Result<Option<CachedScore>, AppError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = redis::cmd("GET")
            .arg(cache_key(candidate_id, job_id))
            .query_async(&mut conn)
            .await
            .map_err(|e| AppError::Cache(format!("GET failed: {e}")))?;

        raw.as_deref().map(decode).transpose()
    }

    async fn put(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
        entry: &CachedScore,
    ) -> Result<(), AppError> {
        let json = serde_json::to_string(entry)
            .map_err(|e| AppError::Cache(format!("serialize failed: {e}")))?;
        let index = job_index_key(job_id);
        let mut conn = self.conn.clone();
        redis::pipe()
            .atomic()
            .cmd("SET")
            .arg(cache_key(candidate_id, job_id))
            .arg(json)
            .arg("EX")
            .arg(self.retention_secs)
            .ignore()
            .cmd("SADD")
            .arg(&index)
            .arg(candidate_id.to_string())
            .ignore()
            .cmd("EXPIRE")
            .arg(&index)
            .arg(self.retention_secs)
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| AppError::Cache(format!("SET failed: {e}")))
    }

    async fn scores_for_job(&self, job_id: Uuid) -> Result<Vec<(Uuid, CachedScore)>, AppError> {
        let mut conn = self.conn.clone();
        let members: Vec<String> = redis::cmd("SMEMBERS")
            .arg(job_index_key(job_id))
            .query_async(&mut conn)
            .await
            .map_err(|e| AppError::Cache(format!("SMEMBERS failed: {e}")))?;

        let candidate_ids: Vec<Uuid> = members
            .iter()
            .filter_map(|member| Uuid::parse_str(member).ok())
            .collect();
        if candidate_ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = candidate_ids
            .iter()
            .map(|candidate_id| cache_key(*candidate_id, job_id))
            .collect();
        let values: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut conn)
            .await
            .map_err(|e| AppError::Cache(format!("MGET failed: {e}")))?;

        // Index members whose score key already expired come back as nil.
        candidate_ids
            .into_iter()
            .zip(values)
            .filter_map(|(candidate_id, raw)| raw.map(|json| (candidate_id, json)))
            .map(|(candidate_id, json)| Ok((candidate_id, decode(&json)?)))
            .collect()
    }
}

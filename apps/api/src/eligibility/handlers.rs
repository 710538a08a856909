//! Axum route handlers for the Eligibility API.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::eligibility::cache::{CachedScore, ScoreCache, ScoreOverride};
use crate::eligibility::ranking::{
    bucket_scores, rank_stored, score_batch, score_distribution, summarize, top_candidates,
    BatchOutcome, BatchSummary, CandidateInput, DistributionBucket, RankedCandidate,
    RejectedCandidate,
};
use crate::eligibility::validation::validate_job;
use crate::errors::AppError;
use crate::models::candidate::CandidateProfile;
use crate::models::job::JobRequirements;
use crate::models::score::ScoreResult;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub candidate_id: Uuid,
    pub job_id: Uuid,
    pub candidate: CandidateProfile,
    pub job: JobRequirements,
    #[serde(default)]
    pub resume_skills: Vec<String>,
    /// Bypass the cache and recompute.
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub candidate_id: Uuid,
    pub job_id: Uuid,
    pub score: ScoreResult,
    /// Override when set, otherwise `score.overall_score`.
    pub effective_score: u32,
    pub calculated_at: DateTime<Utc>,
    pub recalculation_count: u32,
    pub last_recalculated_at: Option<DateTime<Utc>>,
    #[serde(rename = "override")]
    pub score_override: Option<ScoreOverride>,
    pub cached: bool,
}

impl ScoreResponse {
    fn from_entry(candidate_id: Uuid, job_id: Uuid, entry: CachedScore, cached: bool) -> Self {
        Self {
            candidate_id,
            job_id,
            effective_score: entry.effective_score(),
            score: entry.result,
            calculated_at: entry.calculated_at,
            recalculation_count: entry.recalculation_count,
            last_recalculated_at: entry.last_recalculated_at,
            score_override: entry.score_override,
            cached,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OverrideRequest {
    pub candidate_id: Uuid,
    pub job_id: Uuid,
    pub overridden_score: i64,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub job_id: Uuid,
    pub job: JobRequirements,
    pub candidates: Vec<CandidateInput>,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub job_id: Uuid,
    pub results: Vec<RankedCandidate>,
    pub summary: BatchSummary,
    pub distribution: Vec<DistributionBucket>,
    pub rejected: Vec<RejectedCandidate>,
}

#[derive(Debug, Deserialize)]
pub struct TopCandidatesQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct TopCandidatesResponse {
    pub job_id: Uuid,
    pub limit: usize,
    pub candidates: Vec<RankedCandidate>,
}

#[derive(Debug, Serialize)]
pub struct StoredTopCandidatesResponse {
    pub job_id: Uuid,
    pub limit: usize,
    pub candidates: Vec<ScoreResponse>,
}

#[derive(Debug, Serialize)]
pub struct StoredDistributionResponse {
    pub job_id: Uuid,
    pub total: usize,
    pub distribution: Vec<DistributionBucket>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/eligibility/score
///
/// Scores one candidate against one job. A cached result younger than the
/// TTL is returned as-is unless `refresh` is set. Replacing an existing entry
/// counts as a recalculation and keeps its override.
pub async fn handle_score(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    let (candidate_id, job_id) = (request.candidate_id, request.job_id);

    let previous = match state.score_cache.get(candidate_id, job_id).await {
        Ok(previous) => previous,
        Err(e) => {
            warn!("Score cache read failed for {candidate_id}/{job_id}: {e}");
            None
        }
    };

    if let Some(entry) = previous.as_ref() {
        if !request.refresh && entry.is_fresh(Utc::now(), state.config.score_cache_ttl()) {
            return Ok(Json(ScoreResponse::from_entry(
                candidate_id,
                job_id,
                entry.clone(),
                true,
            )));
        }
    }

    let profile = request.candidate.with_resume_skills(&request.resume_skills);
    let result = state.engine.score(&profile, &request.job)?;
    let cache = state.score_cache.as_ref();
    let entry = store_score(cache, candidate_id, job_id, previous, result).await;

    Ok(Json(ScoreResponse::from_entry(candidate_id, job_id, entry, false)))
}

/// PATCH /api/v1/eligibility/override
///
/// Sets an evaluator override on a stored score. The score must be in [0, 100].
pub async fn handle_override(
    State(state): State<AppState>,
    Json(request): Json<OverrideRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    let (candidate_id, job_id) = (request.candidate_id, request.job_id);
    let score = u32::try_from(request.overridden_score)
        .ok()
        .filter(|score| *score <= 100)
        .ok_or_else(|| {
            AppError::Validation(format!(
                "overridden_score must be between 0 and 100, got {}",
                request.overridden_score
            ))
        })?;

    let mut entry = state
        .score_cache
        .get(candidate_id, job_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No stored score for candidate {candidate_id} and job {job_id}"
            ))
        })?;

    entry.apply_override(score, request.reason);
    state.score_cache.put(candidate_id, job_id, &entry).await?;
    info!(
        "Score for {candidate_id}/{job_id} overridden: {} -> {score}",
        entry.result.overall_score
    );

    Ok(Json(ScoreResponse::from_entry(candidate_id, job_id, entry, true)))
}

/// POST /api/v1/eligibility/batch
///
/// Scores every candidate against the job, stores each result and returns
/// them ranked with summary counts and the score distribution.
pub async fn handle_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<BatchResponse>, AppError> {
    let job_id = request.job_id;
    let outcome = run_batch(&state, request).await?;

    let summary = summarize(&outcome);
    info!(
        "Batch eligibility for job {job_id}: {} scored, {} eligible, {} partially eligible, {} rejected",
        outcome.ranked.len(),
        summary.eligible,
        summary.partially_eligible,
        summary.rejected
    );

    Ok(Json(BatchResponse {
        job_id,
        distribution: score_distribution(&outcome.ranked),
        summary,
        results: outcome.ranked,
        rejected: outcome.rejected,
    }))
}

/// POST /api/v1/eligibility/top-candidates?limit=N
///
/// Best N candidates for the job, excluding those classified Not Eligible.
pub async fn handle_top_candidates(
    State(state): State<AppState>,
    Query(query): Query<TopCandidatesQuery>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<TopCandidatesResponse>, AppError> {
    let limit = query.limit.unwrap_or(state.config.top_candidates_limit);
    if limit == 0 {
        return Err(AppError::Validation("limit must be at least 1".to_string()));
    }

    let job_id = request.job_id;
    let outcome = run_batch(&state, request).await?;

    Ok(Json(TopCandidatesResponse {
        job_id,
        limit,
        candidates: top_candidates(&outcome.ranked, limit),
    }))
}

/// GET /api/v1/eligibility/jobs/:job_id/top-candidates?limit=N
///
/// Best N stored scores for the job without re-posting candidates.
pub async fn handle_stored_top_candidates(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(query): Query<TopCandidatesQuery>,
) -> Result<Json<StoredTopCandidatesResponse>, AppError> {
    let limit = query.limit.unwrap_or(state.config.top_candidates_limit);
    if limit == 0 {
        return Err(AppError::Validation("limit must be at least 1".to_string()));
    }

    let stored = state.score_cache.scores_for_job(job_id).await?;
    let candidates = rank_stored(stored, limit)
        .into_iter()
        .map(|(candidate_id, entry)| {
            ScoreResponse::from_entry(candidate_id, job_id, entry, true)
        })
        .collect();

    Ok(Json(StoredTopCandidatesResponse {
        job_id,
        limit,
        candidates,
    }))
}

/// GET /api/v1/eligibility/jobs/:job_id/distribution
///
/// Bucket counts over the effective scores stored for the job.
pub async fn handle_stored_distribution(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<StoredDistributionResponse>, AppError> {
    let scores: Vec<u32> = state
        .score_cache
        .scores_for_job(job_id)
        .await?
        .iter()
        .map(|(_, entry)| entry.effective_score())
        .collect();

    Ok(Json(StoredDistributionResponse {
        job_id,
        total: scores.len(),
        distribution: bucket_scores(&scores),
    }))
}

/// Validates the job, scores off the async runtime and writes results to the cache.
async fn run_batch(state: &AppState, request: BatchRequest) -> Result<BatchOutcome, AppError> {
    validate_job(&request.job)?;

    let engine = Arc::clone(&state.engine);
    let BatchRequest {
        job_id,
        job,
        candidates,
    } = request;

    let outcome =
        tokio::task::spawn_blocking(move || score_batch(&engine, &job, &candidates))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("batch scoring task failed: {e}")))?;

    for rejected in &outcome.rejected {
        warn!(
            "Candidate {} rejected for job {job_id}: {} {}",
            rejected.candidate_id, rejected.field, rejected.reason
        );
    }

    store_results(state.score_cache.as_ref(), job_id, &outcome.ranked).await;
    Ok(outcome)
}

async fn store_results(cache: &dyn ScoreCache, job_id: Uuid, ranked: &[RankedCandidate]) {
    for r in ranked {
        let previous = match cache.get(r.candidate_id, job_id).await {
            Ok(previous) => previous,
            Err(e) => {
                warn!("Score cache read failed for {}/{job_id}: {e}", r.candidate_id);
                None
            }
        };
        store_score(cache, r.candidate_id, job_id, previous, r.score.clone()).await;
    }
}

/// Writes a new entry, or recalculates `previous` in place. Write failures are
/// logged and the entry is still returned.
async fn store_score(
    cache: &dyn ScoreCache,
    candidate_id: Uuid,
    job_id: Uuid,
    previous: Option<CachedScore>,
    result: ScoreResult,
) -> CachedScore {
    let entry = match previous {
        Some(mut entry) => {
            entry.recalculate(result);
            entry
        }
        None => CachedScore::new(result),
    };
    if let Err(e) = cache.put(candidate_id, job_id, &entry).await {
        warn!("Score cache write failed for {candidate_id}/{job_id}: {e}");
    }
    entry
}

//! Batch scoring of many candidates against one job, plus the derived views
//! used by evaluators: summary counts, score distribution and top-N.
//! The same views are available over stored scores, where an evaluator
//! override replaces the computed score.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::eligibility::cache::CachedScore;
use crate::eligibility::engine::EligibilityEngine;
use crate::models::candidate::CandidateProfile;
use crate::models::job::JobRequirements;
use crate::models::score::{EligibilityStatus, ScoreResult};

/// Upper-exclusive bucket edges; the last bucket includes 100.
const DISTRIBUTION_EDGES: [(u32, u32, &str); 5] = [
    (0, 25, "0-25"),
    (25, 50, "25-50"),
    (50, 75, "50-75"),
    (75, 90, "75-90"),
    (90, 101, "90-100"),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateInput {
    pub candidate_id: Uuid,
    pub candidate: CandidateProfile,
    #[serde(default)]
    pub resume_skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub candidate_id: Uuid,
    pub score: ScoreResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedCandidate {
    pub candidate_id: Uuid,
    pub field: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub eligible: usize,
    pub partially_eligible: usize,
    pub not_eligible: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionBucket {
    pub range: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Sorted by overall score descending, ties by candidate id.
    pub ranked: Vec<RankedCandidate>,
    pub rejected: Vec<RejectedCandidate>,
}

/// Scores every candidate in parallel. Invalid candidates are reported in
/// `rejected` instead of failing the whole batch.
pub fn score_batch(
    engine: &EligibilityEngine,
    job: &JobRequirements,
    candidates: &[CandidateInput],
) -> BatchOutcome {
    let results: Vec<Result<RankedCandidate, RejectedCandidate>> = candidates
        .par_iter()
        .map(|input| {
            let profile = input.candidate.with_resume_skills(&input.resume_skills);
            engine
                .score(&profile, job)
                .map(|score| RankedCandidate {
                    candidate_id: input.candidate_id,
                    score,
                })
                .map_err(|e| RejectedCandidate {
                    candidate_id: input.candidate_id,
                    field: e.field,
                    reason: e.reason,
                })
        })
        .collect();

    let mut outcome = BatchOutcome::default();
    for result in results {
        match result {
            Ok(ranked) => outcome.ranked.push(ranked),
            Err(rejected) => outcome.rejected.push(rejected),
        }
    }

    outcome.ranked.sort_by(|a, b| {
        b.score
            .overall_score
            .cmp(&a.score.overall_score)
            .then_with(|| a.candidate_id.cmp(&b.candidate_id))
    });

    outcome
}

pub fn summarize(outcome: &BatchOutcome) -> BatchSummary {
    let mut summary = BatchSummary {
        total: outcome.ranked.len() + outcome.rejected.len(),
        rejected: outcome.rejected.len(),
        ..Default::default()
    };
    for ranked in &outcome.ranked {
        match ranked.score.eligibility_status {
            EligibilityStatus::Eligible => summary.eligible += 1,
            EligibilityStatus::PartiallyEligible => summary.partially_eligible += 1,
            EligibilityStatus::NotEligible => summary.not_eligible += 1,
        }
    }
    summary
}

pub fn score_distribution(ranked: &[RankedCandidate]) -> Vec<DistributionBucket> {
    let scores: Vec<u32> = ranked.iter().map(|r| r.score.overall_score).collect();
    bucket_scores(&scores)
}

/// Counts scores per bucket. Every bucket is listed, including empty ones.
pub fn bucket_scores(scores: &[u32]) -> Vec<DistributionBucket> {
    DISTRIBUTION_EDGES
        .iter()
        .map(|&(low, high, label)| DistributionBucket {
            range: label.to_string(),
            count: scores.iter().filter(|s| (low..high).contains(*s)).count(),
        })
        .collect()
}

/// Best `limit` candidates that are at least partially eligible.
/// Expects `ranked` in the order produced by `score_batch`.
pub fn top_candidates(ranked: &[RankedCandidate], limit: usize) -> Vec<RankedCandidate> {
    ranked
        .iter()
        .filter(|r| r.score.eligibility_status != EligibilityStatus::NotEligible)
        .take(limit)
        .cloned()
        .collect()
}

/// Best `limit` stored entries that are at least partially eligible, ordered
/// by effective score descending, ties by candidate id. The computed
/// classification decides eligibility even when the score is overridden.
pub fn rank_stored(
    mut entries: Vec<(Uuid, CachedScore)>,
    limit: usize,
) -> Vec<(Uuid, CachedScore)> {
    entries.retain(|(_, entry)| entry.result.eligibility_status != EligibilityStatus::NotEligible);
    entries.sort_by(|(a_id, a), (b_id, b)| {
        b.effective_score()
            .cmp(&a.effective_score())
            .then_with(|| a_id.cmp(b_id))
    });
    entries.truncate(limit);
    entries
}

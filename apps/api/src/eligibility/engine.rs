//! Eligibility engine: deterministic scorer of one candidate against one job.
//!
//! overall = round(0.4·skills + 0.3·academic + 0.2·branch + 0.1·experience)
//!
//! The engine owns only immutable policy, so one instance is shared across
//! handlers and rayon workers without locking.

use tracing::debug;

use crate::eligibility::academic::compute_academic_score;
use crate::eligibility::branch::compute_branch_match;
use crate::eligibility::experience::compute_experience_score;
use crate::eligibility::recommendations::build_recommendations;
use crate::eligibility::skills::{compute_skill_match, SkillMatchMode};
use crate::eligibility::validation::{validate_inputs, ValidationError};
use crate::eligibility::weights::{
    ScoringWeights, ELIGIBLE_THRESHOLD, PARTIALLY_ELIGIBLE_THRESHOLD,
};
use crate::models::candidate::CandidateProfile;
use crate::models::job::JobRequirements;
use crate::models::score::{EligibilityStatus, ScoreBreakdown, ScoreResult, SubScore};

#[derive(Debug, Clone, Default)]
pub struct EligibilityEngine {
    weights: ScoringWeights,
    match_mode: SkillMatchMode,
}

impl EligibilityEngine {
    pub fn new(match_mode: SkillMatchMode) -> Self {
        let weights = ScoringWeights::STANDARD;
        debug_assert!((weights.sum() - 1.0).abs() < 1e-9);
        Self {
            weights,
            match_mode,
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Scores `candidate` against `job`.
    ///
    /// Resume skills must already be merged into the candidate
    /// (see `CandidateProfile::with_resume_skills`). Fails before any
    /// computation if an input is out of range.
    pub fn score(
        &self,
        candidate: &CandidateProfile,
        job: &JobRequirements,
    ) -> Result<ScoreResult, ValidationError> {
        validate_inputs(candidate, job)?;

        let (skill_score, skill_details) = compute_skill_match(
            &candidate.technical_skills,
            &job.mandatory_skills,
            &job.preferred_skills,
            self.match_mode,
        );
        let (academic_score, academic_details) =
            compute_academic_score(candidate.cgpa, job.min_cgpa);
        let (branch_score, branch_details) =
            compute_branch_match(&candidate.branch, &job.eligible_branches);
        let (experience_score, experience_details) = compute_experience_score(
            &candidate.work_history,
            candidate.project_count(),
            job.min_experience_months,
        );

        let breakdown = ScoreBreakdown {
            skill_match: SubScore::new(skill_score, self.weights.skill_match, skill_details),
            academic: SubScore::new(academic_score, self.weights.academic, academic_details),
            branch_match: SubScore::new(branch_score, self.weights.branch_match, branch_details),
            experience: SubScore::new(
                experience_score,
                self.weights.experience,
                experience_details,
            ),
        };

        let overall_score = breakdown.weighted_total().round().clamp(0.0, 100.0) as u32;
        let eligibility_status = classify(overall_score, &breakdown);
        let recommendations = build_recommendations(&breakdown);

        debug!(
            skill = skill_score,
            academic = academic_score,
            branch = branch_score,
            experience = experience_score,
            overall = overall_score,
            status = ?eligibility_status,
            "Eligibility scored"
        );

        Ok(ScoreResult {
            overall_score,
            eligibility_status,
            breakdown,
            recommendations,
        })
    }
}

/// A branch mismatch blocks both eligible tiers regardless of the overall score.
pub fn classify(overall_score: u32, breakdown: &ScoreBreakdown) -> EligibilityStatus {
    let branch_ok = breakdown.branch_match.score >= 100.0;
    let academic_ok = breakdown.academic.details.meets_requirement;

    if overall_score >= ELIGIBLE_THRESHOLD && branch_ok && academic_ok {
        EligibilityStatus::Eligible
    } else if overall_score >= PARTIALLY_ELIGIBLE_THRESHOLD && branch_ok {
        EligibilityStatus::PartiallyEligible
    } else {
        EligibilityStatus::NotEligible
    }
}

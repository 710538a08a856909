use serde::{Deserialize, Serialize};

/// Classification attached to every score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EligibilityStatus {
    Eligible,
    #[serde(rename = "Partially Eligible")]
    PartiallyEligible,
    #[serde(rename = "Not Eligible")]
    NotEligible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    /// Accepted when reading stored entries; no current rule emits it.
    #[allow(dead_code)]
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatchDetails {
    pub mandatory_matched: Vec<String>,
    pub mandatory_missing: Vec<String>,
    pub preferred_matched: Vec<String>,
    pub mandatory_match_percentage: f64,
    pub preferred_match_percentage: f64,
    pub total_required: usize,
    pub total_matched: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcademicDetails {
    pub candidate_cgpa: f64,
    pub required_cgpa: f64,
    pub cgpa_difference: f64,
    pub meets_requirement: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchDetails {
    pub candidate_branch: String,
    pub eligible_branches: Vec<String>,
    pub is_match: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceDetails {
    pub total_experience_months: i64,
    pub internship_count: usize,
    pub project_count: usize,
    pub meets_requirement: bool,
}

/// One weighted component of the overall score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubScore<D> {
    pub score: f64, // 0 – 100
    pub weight: f64,
    pub weighted_contribution: f64,
    pub details: D,
}

impl<D> SubScore<D> {
    pub fn new(score: f64, weight: f64, details: D) -> Self {
        Self {
            score,
            weight,
            weighted_contribution: score * weight,
            details,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub skill_match: SubScore<SkillMatchDetails>,
    pub academic: SubScore<AcademicDetails>,
    pub branch_match: SubScore<BranchDetails>,
    pub experience: SubScore<ExperienceDetails>,
}

impl ScoreBreakdown {
    pub fn weighted_total(&self) -> f64 {
        self.skill_match.weighted_contribution
            + self.academic.weighted_contribution
            + self.branch_match.weighted_contribution
            + self.experience.weighted_contribution
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementArea {
    pub area: String,
    pub current_level: String,
    pub target_level: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub for_candidate: Vec<String>,
    pub for_evaluator: Vec<String>,
    pub improvement_areas: Vec<ImprovementArea>,
}

/// Full eligibility result for one candidate-job pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub overall_score: u32, // 0 – 100
    pub eligibility_status: EligibilityStatus,
    pub breakdown: ScoreBreakdown,
    pub recommendations: Recommendations,
}

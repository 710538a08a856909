use serde::Serialize;

/// Policy weights of the four sub-scores. They must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringWeights {
    pub skill_match: f64,
    pub academic: f64,
    pub branch_match: f64,
    pub experience: f64,
}

impl ScoringWeights {
    /// Skill 40%, academic 30%, branch 20%, experience 10%.
    pub const STANDARD: ScoringWeights = ScoringWeights {
        skill_match: 0.4,
        academic: 0.3,
        branch_match: 0.2,
        experience: 0.1,
    };

    pub fn sum(&self) -> f64 {
        self.skill_match + self.academic + self.branch_match + self.experience
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::STANDARD
    }
}

// Shares of the skill sub-score.
pub const MANDATORY_SKILL_SHARE: f64 = 0.7;
pub const PREFERRED_SKILL_SHARE: f64 = 0.3;

pub const MAX_CGPA: f64 = 10.0;
/// Academic score for meeting the CGPA bar exactly.
pub const ACADEMIC_FLOOR: f64 = 60.0;
/// Extra academic points available between the bar and `MAX_CGPA`.
pub const ACADEMIC_HEADROOM: f64 = 40.0;
/// Ceiling of the academic score when below the bar.
pub const ACADEMIC_SHORTFALL_CAP: f64 = 50.0;

pub const EXPERIENCE_BASE: f64 = 50.0;
pub const EXPERIENCE_REQUIREMENT_BONUS: f64 = 25.0;
pub const INTERNSHIP_POINTS: f64 = 5.0;
pub const INTERNSHIP_CAP: f64 = 15.0;
pub const PROJECT_POINTS: f64 = 3.0;
pub const PROJECT_CAP: f64 = 10.0;

pub const ELIGIBLE_THRESHOLD: u32 = 70;
pub const PARTIALLY_ELIGIBLE_THRESHOLD: u32 = 50;

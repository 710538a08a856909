use serde::{Deserialize, Serialize};

/// Eligibility criteria of a job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequirements {
    #[serde(default)]
    pub mandatory_skills: Vec<String>,
    #[serde(default)]
    pub preferred_skills: Vec<String>,
    #[serde(default)]
    pub min_cgpa: f64,
    #[serde(default)]
    pub eligible_branches: Vec<String>,
    /// Signed; negative values are rejected by validation.
    #[serde(default)]
    pub min_experience_months: i64,
}

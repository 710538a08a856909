//! Skill match sub-score: mandatory skills carry 70% of it, preferred skills 30%.

use serde::Serialize;

use crate::eligibility::weights::{MANDATORY_SKILL_SHARE, PREFERRED_SKILL_SHARE};
use crate::models::score::SkillMatchDetails;

/// How a candidate skill is compared with a required skill (both lowercased).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillMatchMode {
    /// Either string contains the other: "react" matches "react.js".
    /// Also lets "java" match "javascript".
    #[default]
    Substring,
    /// Strings must be equal after trimming and lowercasing.
    Exact,
}

impl SkillMatchMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "substring" => Some(Self::Substring),
            "exact" => Some(Self::Exact),
            _ => None,
        }
    }

    fn matches(self, candidate: &str, required: &str) -> bool {
        match self {
            Self::Substring => candidate.contains(required) || required.contains(candidate),
            Self::Exact => candidate == required,
        }
    }
}

/// Computes the skill sub-score (0 – 100) and its evidence.
///
/// An empty requirement list gives full credit for its share. Blank strings
/// on either side are ignored.
pub fn compute_skill_match(
    candidate_skills: &[String],
    mandatory: &[String],
    preferred: &[String],
    mode: SkillMatchMode,
) -> (f64, SkillMatchDetails) {
    let candidate: Vec<String> = candidate_skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    let mandatory = non_blank(mandatory);
    let preferred = non_blank(preferred);

    let (mandatory_matched, mandatory_missing): (Vec<String>, Vec<String>) = mandatory
        .iter()
        .cloned()
        .partition(|skill| has_skill(&candidate, skill, mode));
    let preferred_matched: Vec<String> = preferred
        .iter()
        .filter(|skill| has_skill(&candidate, skill, mode))
        .cloned()
        .collect();

    let mandatory_ratio = match_ratio(mandatory_matched.len(), mandatory.len());
    let preferred_ratio = match_ratio(preferred_matched.len(), preferred.len());

    let score = (mandatory_ratio * 100.0 * MANDATORY_SKILL_SHARE
        + preferred_ratio * 100.0 * PREFERRED_SKILL_SHARE)
        .min(100.0);

    let details = SkillMatchDetails {
        total_required: mandatory.len() + preferred.len(),
        total_matched: mandatory_matched.len() + preferred_matched.len(),
        mandatory_match_percentage: mandatory_ratio * 100.0,
        preferred_match_percentage: preferred_ratio * 100.0,
        mandatory_matched,
        mandatory_missing,
        preferred_matched,
    };

    (score, details)
}

fn non_blank(skills: &[String]) -> Vec<String> {
    skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn has_skill(candidate: &[String], required: &str, mode: SkillMatchMode) -> bool {
    let required = required.to_lowercase();
    candidate.iter().any(|c| mode.matches(c, &required))
}

fn match_ratio(matched: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        matched as f64 / total as f64
    }
}

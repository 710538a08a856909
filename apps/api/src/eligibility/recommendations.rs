//! Rule-based recommendations derived from a score breakdown.
//!
//! Rules fire independently of the eligibility classification, so an
//! eligible candidate can still receive improvement suggestions.

use crate::models::score::{ImprovementArea, Priority, Recommendations, ScoreBreakdown};

const MAX_LISTED_SKILLS: usize = 3;
const STRONG_SKILL_SCORE: f64 = 70.0;
const EXCELLENT_ACADEMIC_SCORE: f64 = 80.0;
const MULTIPLE_PROJECTS: usize = 3;

pub fn build_recommendations(breakdown: &ScoreBreakdown) -> Recommendations {
    let mut recs = Recommendations::default();

    let skills = &breakdown.skill_match.details;
    if !skills.mandatory_missing.is_empty() {
        let top_missing: Vec<&str> = skills
            .mandatory_missing
            .iter()
            .take(MAX_LISTED_SKILLS)
            .map(String::as_str)
            .collect();
        recs.for_candidate
            .push(format!("Consider learning: {}", top_missing.join(", ")));
        recs.improvement_areas.push(ImprovementArea {
            area: "Technical Skills".to_string(),
            // Exact halves round up (12.5 -> 13), unlike `{:.0}`.
            current_level: format!("{}% match", skills.mandatory_match_percentage.round()),
            target_level: "80% match".to_string(),
            priority: Priority::High,
        });
    }

    let academic = &breakdown.academic.details;
    if !academic.meets_requirement {
        recs.for_candidate.push(
            "Focus on improving academic performance to meet minimum CGPA requirement"
                .to_string(),
        );
        recs.improvement_areas.push(ImprovementArea {
            area: "Academics".to_string(),
            current_level: format!("{} CGPA", academic.candidate_cgpa),
            target_level: format!("{} CGPA", academic.required_cgpa),
            priority: Priority::High,
        });
    }

    let experience = &breakdown.experience.details;
    if experience.internship_count == 0 {
        recs.for_candidate
            .push("Gain practical experience through internships".to_string());
        recs.improvement_areas.push(ImprovementArea {
            area: "Experience".to_string(),
            current_level: "No internships".to_string(),
            target_level: "At least 1 internship".to_string(),
            priority: Priority::Medium,
        });
    }

    if breakdown.skill_match.score >= STRONG_SKILL_SCORE {
        recs.for_evaluator
            .push("Strong skill match - consider for technical rounds".to_string());
    }
    if breakdown.academic.score >= EXCELLENT_ACADEMIC_SCORE {
        recs.for_evaluator
            .push("Excellent academic record".to_string());
    }
    if experience.project_count >= MULTIPLE_PROJECTS {
        recs.for_evaluator
            .push("Has multiple relevant projects".to_string());
    }

    recs
}

use chrono::NaiveDate;

use crate::eligibility::weights::{
    EXPERIENCE_BASE, EXPERIENCE_REQUIREMENT_BONUS, INTERNSHIP_CAP, INTERNSHIP_POINTS,
    PROJECT_CAP, PROJECT_POINTS,
};
use crate::models::candidate::{WorkEntry, WorkKind};
use crate::models::score::ExperienceDetails;

const DAYS_PER_MONTH: i64 = 30;

/// Experience sub-score (0 – 100).
///
/// Only entries with both dates add months; every internship counts towards
/// the internship bonus whether dated or not.
pub fn compute_experience_score(
    work_history: &[WorkEntry],
    project_count: usize,
    min_experience_months: i64,
) -> (f64, ExperienceDetails) {
    let total_experience_months: i64 = work_history
        .iter()
        .filter_map(|entry| match (entry.start_date, entry.end_date) {
            (Some(start), Some(end)) => Some(months_between(start, end)),
            _ => None,
        })
        .sum();

    let internship_count = work_history
        .iter()
        .filter(|entry| entry.kind == WorkKind::Internship)
        .count();

    let meets_requirement = total_experience_months >= min_experience_months;

    let mut score = EXPERIENCE_BASE;
    if meets_requirement {
        score += EXPERIENCE_REQUIREMENT_BONUS;
    }
    score += (internship_count as f64 * INTERNSHIP_POINTS).min(INTERNSHIP_CAP);
    score += (project_count as f64 * PROJECT_POINTS).min(PROJECT_CAP);

    let details = ExperienceDetails {
        total_experience_months,
        internship_count,
        project_count,
        meets_requirement,
    };

    (score.min(100.0), details)
}

/// Whole months between two dates, rounded up in 30-day steps.
/// Callers guarantee `end >= start`.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> i64 {
    let days = (end - start).num_days().max(0);
    (days + DAYS_PER_MONTH - 1) / DAYS_PER_MONTH
}

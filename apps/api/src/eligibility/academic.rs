use crate::eligibility::weights::{
    ACADEMIC_FLOOR, ACADEMIC_HEADROOM, ACADEMIC_SHORTFALL_CAP, MAX_CGPA,
};
use crate::models::score::AcademicDetails;

/// Academic sub-score (0 – 100). Inputs must already be validated to [0, 10].
///
/// Meeting the bar is worth at least 60; the headroom up to 10 adds up to 40.
/// Falling short scales linearly from 0 to 50.
pub fn compute_academic_score(cgpa: f64, min_cgpa: f64) -> (f64, AcademicDetails) {
    let meets_requirement = cgpa >= min_cgpa;

    let score = if meets_requirement {
        let range = MAX_CGPA - min_cgpa;
        if range <= 0.0 {
            ACADEMIC_FLOOR
        } else {
            (ACADEMIC_FLOOR + (cgpa - min_cgpa) / range * ACADEMIC_HEADROOM).min(100.0)
        }
    } else if min_cgpa <= 0.0 {
        0.0
    } else {
        cgpa / min_cgpa * ACADEMIC_SHORTFALL_CAP
    };

    let details = AcademicDetails {
        candidate_cgpa: cgpa,
        required_cgpa: min_cgpa,
        cgpa_difference: cgpa - min_cgpa,
        meets_requirement,
    };

    (score, details)
}

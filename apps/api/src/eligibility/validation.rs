use thiserror::Error;

use crate::eligibility::weights::MAX_CGPA;
use crate::models::candidate::CandidateProfile;
use crate::models::job::JobRequirements;

/// Rejected input. `field` is the serialized path of the offending value.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Checks every numeric input before scoring. Values are never clamped.
pub fn validate_inputs(
    candidate: &CandidateProfile,
    job: &JobRequirements,
) -> Result<(), ValidationError> {
    validate_job(job)?;
    check_cgpa("candidate.cgpa", candidate.cgpa)?;

    for (i, entry) in candidate.work_history.iter().enumerate() {
        if let (Some(start), Some(end)) = (entry.start_date, entry.end_date) {
            if end < start {
                return Err(ValidationError::new(
                    format!("candidate.work_history[{i}].end_date"),
                    format!("{end} is before start date {start}"),
                ));
            }
        }
    }

    Ok(())
}

/// Job-only checks, usable before scoring a batch against the job.
pub fn validate_job(job: &JobRequirements) -> Result<(), ValidationError> {
    check_cgpa("job.min_cgpa", job.min_cgpa)?;

    if job.min_experience_months < 0 {
        return Err(ValidationError::new(
            "job.min_experience_months",
            format!("must be non-negative, got {}", job.min_experience_months),
        ));
    }
    Ok(())
}

fn check_cgpa(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || !(0.0..=MAX_CGPA).contains(&value) {
        return Err(ValidationError::new(
            field,
            format!("must be within [0, {MAX_CGPA}], got {value}"),
        ));
    }
    Ok(())
}

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kind of a work-history entry. Only `Internship` is counted separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkKind {
    Internship,
    #[serde(alias = "Full-time")]
    FullTime,
    #[serde(alias = "Part-time")]
    PartTime,
    Freelance,
    Project,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkEntry {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// `None` for ongoing roles; such entries add no months.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub kind: WorkKind,
}

/// Candidate profile as read from the profile store. Project contents are opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(default)]
    pub technical_skills: Vec<String>,
    pub cgpa: f64,
    pub branch: String,
    #[serde(default)]
    pub work_history: Vec<WorkEntry>,
    #[serde(default)]
    pub projects: Vec<serde_json::Value>,
}

impl CandidateProfile {
    /// Returns a copy whose skill set also contains the resume-extracted skills.
    ///
    /// Deduplication is case-insensitive and keeps the first spelling seen, so
    /// profile skills win over resume skills.
    pub fn with_resume_skills(&self, resume_skills: &[String]) -> Self {
        let mut seen = HashSet::new();
        let technical_skills = self
            .technical_skills
            .iter()
            .chain(resume_skills.iter())
            .filter(|s| !s.trim().is_empty())
            .filter(|s| seen.insert(s.trim().to_lowercase()))
            .cloned()
            .collect();

        Self {
            technical_skills,
            ..self.clone()
        }
    }

    pub fn project_count(&self) -> usize {
        self.projects.len()
    }
}

use crate::models::score::BranchDetails;

/// Branch sub-score: 100 when the candidate's branch equals, contains or is
/// contained by any eligible branch (case-insensitive), otherwise 0.
pub fn compute_branch_match(branch: &str, eligible_branches: &[String]) -> (f64, BranchDetails) {
    let candidate = branch.trim().to_lowercase();

    let is_match = !candidate.is_empty()
        && eligible_branches.iter().any(|b| {
            let eligible = b.trim().to_lowercase();
            !eligible.is_empty()
                && (eligible == candidate
                    || eligible.contains(&candidate)
                    || candidate.contains(&eligible))
        });

    let details = BranchDetails {
        candidate_branch: branch.to_string(),
        eligible_branches: eligible_branches.to_vec(),
        is_match,
    };

    (if is_match { 100.0 } else { 0.0 }, details)
}

// Eligibility & matching engine
// Implements: weighted sub-scores, classification, recommendations, batch ranking.
// The engine itself does no I/O; caching and HTTP live in `cache` and `handlers`.

pub mod academic;
pub mod branch;
pub mod cache;
pub mod engine;
pub mod experience;
pub mod handlers;
pub mod ranking;
pub mod recommendations;
pub mod skills;
pub mod validation;
pub mod weights;

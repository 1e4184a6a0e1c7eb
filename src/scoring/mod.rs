//! Score aggregation and reporting.

mod aggregation;
mod mqm;
mod report;

pub use aggregation::{
    aggregate, category_error, combine, verified_score, weighted_mean, VERIFIED_ABSENT_DAMPING,
};
pub use report::{consistency_scores, error_breakdown, verified_errors, QualityReport};
pub use mqm::{ErrorInstance, MqmScore, MqmScorer, MqmWeights, Severity, SeverityCounts};

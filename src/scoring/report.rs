//! Read-only diagnostic views over a finished state.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{AggregationOutput, Category, SubCategory};
use crate::state::EvaluationState;

use super::aggregate;

/// Raw Stage 2 probabilities per category and sub-category.
///
/// Every category is present; sub-categories without a result are omitted.
#[must_use]
pub fn error_breakdown(state: &EvaluationState) -> BTreeMap<Category, BTreeMap<SubCategory, f64>> {
    Category::ALL
        .into_iter()
        .map(|category| {
            let subs = state
                .stage_two_for(category)
                .into_iter()
                .map(|(sub, r)| (sub, r.re_evaluated_prob))
                .collect();
            (category, subs)
        })
        .collect()
}

/// Stage 3 consistency score per verified category.
#[must_use]
pub fn consistency_scores(state: &EvaluationState) -> BTreeMap<Category, f64> {
    Category::ALL
        .into_iter()
        .filter_map(|c| state.stage_three(c).map(|r| (c, r.consistency_score)))
        .collect()
}

/// Whether Stage 3 verified an error, per verified category.
#[must_use]
pub fn verified_errors(state: &EvaluationState) -> BTreeMap<Category, bool> {
    Category::ALL
        .into_iter()
        .filter_map(|c| state.stage_three(c).map(|r| (c, r.errors_exists.is_yes())))
        .collect()
}

/// Final score together with its diagnostic views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    /// Final aggregation.
    pub aggregation: AggregationOutput,
    /// See [`error_breakdown`].
    pub breakdown: BTreeMap<Category, BTreeMap<SubCategory, f64>>,
    /// See [`consistency_scores`].
    pub consistency: BTreeMap<Category, f64>,
    /// See [`verified_errors`].
    pub verified: BTreeMap<Category, bool>,
}

impl QualityReport {
    /// Build the report; aggregates the state if that has not happened yet.
    #[must_use]
    pub fn from_state(state: &EvaluationState) -> Self {
        Self {
            aggregation: state
                .aggregation()
                .copied()
                .unwrap_or_else(|| aggregate(state)),
            breakdown: error_breakdown(state),
            consistency: consistency_scores(state),
            verified: verified_errors(state),
        }
    }
}

//! Final score aggregation.
//!
//! Each category's error probability is the confidence-weighted mean of its
//! Stage 2 re-evaluations, adjusted by the Stage 3 verification:
//!
//! | Stage 3 | Category error |
//! |---------|----------------|
//! | absent | base |
//! | `errorsExists == NO` | base * [`VERIFIED_ABSENT_DAMPING`] |
//! | `errorsExists == YES` | base * (consistencyScore / 100) |
//!
//! The overall error probability weights the categories by
//! [`Category::weight`]; the final score is `(1 - overall) * 100`.

use crate::model::{AggregationOutput, Category, StageThreeResult, Verdict};
use crate::state::EvaluationState;

/// Multiplier applied when Stage 3 finds no verified error.
pub const VERIFIED_ABSENT_DAMPING: f64 = 0.3;

/// Confidence-weighted mean of probabilities.
///
/// Weights are `confidence / 100`. Pairs are matched by position; every
/// confidence counts toward the total weight. Returns 0 when either list is
/// empty or the total weight is exactly 0.
#[must_use]
pub fn weighted_mean(probabilities: &[f64], confidences: &[f64]) -> f64 {
    if probabilities.is_empty() || confidences.is_empty() {
        return 0.0;
    }
    let total_weight: f64 = confidences.iter().map(|c| c / 100.0).sum();
    if total_weight == 0.0 {
        return 0.0;
    }
    let weighted: f64 = probabilities
        .iter()
        .zip(confidences)
        .map(|(p, c)| p * (c / 100.0))
        .sum();
    weighted / total_weight
}

/// Adjust a base score by the Stage 3 verification of its category.
#[must_use]
pub fn verified_score(base: f64, stage_three: Option<&StageThreeResult>) -> f64 {
    match stage_three {
        None => base,
        Some(s) if s.errors_exists == Verdict::No => base * VERIFIED_ABSENT_DAMPING,
        Some(s) => base * (s.consistency_score / 100.0),
    }
}

/// Damped error probability of one category.
#[must_use]
pub fn category_error(state: &EvaluationState, category: Category) -> f64 {
    let (probabilities, confidences): (Vec<f64>, Vec<f64>) = state
        .stage_two_for(category)
        .into_iter()
        .map(|(_, r)| (r.re_evaluated_prob, r.re_evaluated_confidence))
        .unzip();
    let base = weighted_mean(&probabilities, &confidences);
    verified_score(base, state.stage_three(category))
}

/// Combine category errors into the overall probability and final score.
///
/// The score is not clamped: out-of-range inputs yield out-of-range output.
#[must_use]
pub fn combine(accuracy: f64, fluency: f64, terminology: f64, style: f64) -> AggregationOutput {
    let overall = Category::Accuracy.weight() * accuracy
        + Category::Fluency.weight() * fluency
        + Category::Terminology.weight() * terminology
        + Category::Style.weight() * style;
    AggregationOutput {
        accuracy_error: accuracy,
        fluency_error: fluency,
        terminology_error: terminology,
        style_error: style,
        overall_error_probability: overall,
        final_quality_score_100: (1.0 - overall) * 100.0,
    }
}

/// Aggregate the final state of a run.
#[must_use]
pub fn aggregate(state: &EvaluationState) -> AggregationOutput {
    combine(
        category_error(state, Category::Accuracy),
        category_error(state, Category::Fluency),
        category_error(state, Category::Terminology),
        category_error(state, Category::Style),
    )
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::cast_precision_loss
)]
mod tests {
    use super::*;
    use crate::engine::Blackboard;
    use crate::model::{EvaluationInput, StageTwoResult, SubCategory};
    use crate::state::SlotUpdate;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn stage_two(prob: f64, conf: f64) -> StageTwoResult {
        StageTwoResult {
            re_evaluated_prob: prob,
            thoughts_on_stage1: String::new(),
            reason: String::new(),
            re_evaluated_confidence: conf,
        }
    }

    fn stage_three(verdict: Verdict, consistency: f64) -> StageThreeResult {
        StageThreeResult {
            consistency_score: consistency,
            errors_exists: verdict,
            existance_reasoning: String::new(),
        }
    }

    fn accuracy_state(stage3: Option<StageThreeResult>) -> EvaluationState {
        let mut state = EvaluationState::new(EvaluationInput::new("s", "t", "r"));
        let subs = [
            (SubCategory::Addition, 0.8, 100.0),
            (SubCategory::Omission, 0.2, 50.0),
            (SubCategory::Mistranslation, 0.0, 0.0),
            (SubCategory::UntranslatedText, 0.0, 0.0),
        ];
        for (sub, p, c) in subs {
            state.merge(SlotUpdate::StageTwo(sub, stage_two(p, c)));
        }
        if let Some(s) = stage3 {
            state.merge(SlotUpdate::StageThree(Category::Accuracy, s));
        }
        state
    }

    #[test]
    fn test_weighted_mean_empty_lists() {
        assert_eq!(weighted_mean(&[], &[]), 0.0);
        assert_eq!(weighted_mean(&[0.5], &[]), 0.0);
        assert_eq!(weighted_mean(&[], &[80.0]), 0.0);
    }

    #[test]
    fn test_weighted_mean_zero_weight() {
        assert_eq!(weighted_mean(&[0.9, 0.4], &[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_weighted_mean_scenario() {
        let mean = weighted_mean(&[0.8, 0.2, 0.0, 0.0], &[100.0, 50.0, 0.0, 0.0]);
        assert!((mean - 0.6).abs() < EPS);
    }

    #[test]
    fn test_weighted_mean_unequal_lengths_use_full_denominator() {
        // numerator pairs (0.5, 100); denominator 1.0 + 1.0
        assert!((weighted_mean(&[0.5], &[100.0, 100.0]) - 0.25).abs() < EPS);
    }

    #[test]
    fn test_category_without_stage_three() {
        let state = accuracy_state(None);
        assert!((category_error(&state, Category::Accuracy) - 0.6).abs() < EPS);
    }

    #[test]
    fn test_category_verified_yes() {
        let state = accuracy_state(Some(stage_three(Verdict::Yes, 80.0)));
        assert!((category_error(&state, Category::Accuracy) - 0.48).abs() < EPS);
    }

    #[test]
    fn test_category_verified_no_is_damped() {
        let state = accuracy_state(Some(stage_three(Verdict::No, 95.0)));
        assert!((category_error(&state, Category::Accuracy) - 0.18).abs() < EPS);
    }

    #[test]
    fn test_verified_yes_scales_by_consistency_factor_exactly() {
        let score = verified_score(0.1, Some(&stage_three(Verdict::Yes, 3.0)));
        assert_eq!(score.to_bits(), (0.1_f64 * (3.0 / 100.0)).to_bits());
    }

    #[test]
    fn test_verified_no_ignores_consistency() {
        let score = verified_score(0.5, Some(&stage_three(Verdict::No, 3.0)));
        assert_eq!(score.to_bits(), (0.5 * VERIFIED_ABSENT_DAMPING).to_bits());
        assert_eq!(verified_score(0.5, None), 0.5);
    }

    #[test]
    fn test_all_zero_scores_full_quality() {
        let mut state = EvaluationState::new(EvaluationInput::new("s", "t", "r"));
        for sub in SubCategory::ALL {
            state.merge(SlotUpdate::StageTwo(sub, stage_two(0.0, 0.0)));
        }
        let out = aggregate(&state);
        assert_eq!(out.overall_error_probability, 0.0);
        assert_eq!(out.final_quality_score_100, 100.0);
    }

    #[test]
    fn test_empty_state_aggregates_to_full_quality() {
        let state = EvaluationState::new(EvaluationInput::new("s", "t", "r"));
        assert_eq!(aggregate(&state).final_quality_score_100, 100.0);
    }

    #[test]
    fn test_combine_weights() {
        let out = combine(1.0, 0.5, 0.25, 0.1);
        assert!((out.overall_error_probability - (0.4 + 0.15 + 0.05 + 0.01)).abs() < EPS);
        assert!((out.final_quality_score_100 - 39.0).abs() < 1e-7);
    }

    #[test]
    fn test_combine_not_clamped() {
        let out = combine(2.0, 0.0, 0.0, 0.0);
        assert!((out.final_quality_score_100 - 20.0).abs() < EPS);
        let out = combine(3.0, 1.0, 1.0, 1.0);
        assert!(out.final_quality_score_100 < 0.0);
    }

    proptest! {
        #[test]
        fn prop_weighted_mean_bounded(
            pairs in prop::collection::vec((0.0f64..=1.0, 0.0f64..=100.0), 1..16)
        ) {
            let (probs, confs): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
            let mean = weighted_mean(&probs, &confs);
            prop_assert!((-EPS..=1.0 + EPS).contains(&mean));
        }

        #[test]
        fn prop_uniform_confidence_is_plain_mean(
            probs in prop::collection::vec(0.0f64..=1.0, 1..16),
            conf in 1.0f64..=100.0
        ) {
            let confs = vec![conf; probs.len()];
            let plain = probs.iter().sum::<f64>() / probs.len() as f64;
            prop_assert!((weighted_mean(&probs, &confs) - plain).abs() < 1e-9);
        }

        #[test]
        fn prop_verified_yes_matches_consistency_factor(
            base in 0.0f64..=1.0,
            consistency in 0.0f64..=100.0
        ) {
            let score = verified_score(base, Some(&stage_three(Verdict::Yes, consistency)));
            prop_assert_eq!(score.to_bits(), (base * (consistency / 100.0)).to_bits());
        }

        #[test]
        fn prop_final_score_complements_overall(
            a in 0.0f64..=1.0, f in 0.0f64..=1.0, t in 0.0f64..=1.0, s in 0.0f64..=1.0
        ) {
            let out = combine(a, f, t, s);
            prop_assert!((out.final_quality_score_100 - (1.0 - out.overall_error_probability) * 100.0).abs() < 1e-9);
            prop_assert!((-1e-9..=100.0 + 1e-9).contains(&out.final_quality_score_100));
        }
    }
}

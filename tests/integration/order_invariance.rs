//! Results must not depend on the order in which independent tasks finish.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use mt_quality::engine::ExecutorConfig;
use mt_quality::model::{Category, EvaluationInput, SubCategory, Verdict};
use mt_quality::pipeline::Evaluator;
use mt_quality::scoring::QualityReport;
use mt_quality::state::EvaluationState;
use proptest::prelude::*;

use super::common::ScriptedJudge;

fn evaluate(yields: Vec<usize>, audits: Vec<Verdict>, concurrency: usize) -> EvaluationState {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let judge = ScriptedJudge::new().with_yields(yields).with_audits(audits);
    let evaluator = Evaluator::new(
        Arc::new(judge),
        ExecutorConfig::default().with_max_concurrency(concurrency),
    )
    .unwrap();
    let input = EvaluationInput::new("Hallo Welt", "Hello word", "Hello world").with_max_rounds(2);
    runtime.block_on(evaluator.evaluate(input)).unwrap()
}

fn assert_same_results(a: &EvaluationState, b: &EvaluationState) {
    for category in Category::ALL {
        assert_eq!(a.stage_one(category), b.stage_one(category));
        assert_eq!(a.stage_three(category), b.stage_three(category));
    }
    for sub in SubCategory::ALL {
        assert_eq!(a.stage_two(sub), b.stage_two(sub));
    }
    assert_eq!(a.audit(), b.audit());
    assert_eq!(a.round(), b.round());
    assert_eq!(QualityReport::from_state(a), QualityReport::from_state(b));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_completion_order_does_not_change_results(
        yields in prop::collection::vec(0usize..20, 22),
        concurrency in 1usize..=22,
    ) {
        let audits = vec![Verdict::Yes, Verdict::No];
        let baseline = evaluate(Vec::new(), audits.clone(), 22);
        let shuffled = evaluate(yields, audits, concurrency);
        assert_same_results(&baseline, &shuffled);
    }
}

#[test]
fn test_serial_and_parallel_agree() {
    let audits = vec![Verdict::No];
    let serial = evaluate(Vec::new(), audits.clone(), 1);
    let parallel = evaluate((0..22).rev().collect(), audits, 22);
    assert_same_results(&serial, &parallel);
}

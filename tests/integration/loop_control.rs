//! Round loop bounds and audit carry-over.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use mt_quality::engine::ExecutorConfig;
use mt_quality::judge::JudgmentRequest;
use mt_quality::model::{EvaluationInput, Verdict};
use mt_quality::pipeline::Evaluator;
use pretty_assertions::assert_eq;
use test_case::test_case;

use super::common::ScriptedJudge;

fn input() -> EvaluationInput {
    EvaluationInput::new("Bonjour", "Hello", "Good morning")
}

async fn run(judge: ScriptedJudge, input: EvaluationInput) -> (Arc<ScriptedJudge>, u32) {
    let judge = Arc::new(judge);
    let evaluator = Evaluator::new(Arc::clone(&judge), ExecutorConfig::default()).unwrap();
    let state = evaluator.evaluate(input).await.unwrap();
    (judge, state.round())
}

#[test_case(None, None, 1 ; "defaults run one round")]
#[test_case(Some(1), Some(3), 3 ; "runs up to the limit")]
#[test_case(Some(2), Some(3), 2 ; "counts from the start round")]
#[test_case(Some(0), Some(0), 1 ; "zero bounds mean one")]
#[test_case(Some(4), Some(2), 1 ; "start past limit runs once")]
#[tokio::test]
async fn test_persistent_findings_bounded(round: Option<u32>, max: Option<u32>, passes: usize) {
    let mut input = input();
    input.round = round;
    input.max_rounds = max;
    let judge = ScriptedJudge::new().with_audits(vec![Verdict::Yes]);

    let (judge, _) = run(judge, input).await;

    assert_eq!(judge.audit_calls(), passes);
    assert_eq!(judge.requests().len(), passes * 22);
}

#[tokio::test]
async fn test_clean_audit_stops_early() {
    let judge = ScriptedJudge::new().with_audits(vec![Verdict::Yes, Verdict::Yes, Verdict::No]);

    let (judge, last_round) = run(judge, input().with_max_rounds(10)).await;

    assert_eq!(judge.audit_calls(), 3);
    assert_eq!(last_round, 3);
}

#[tokio::test]
async fn test_start_round_past_limit_keeps_round() {
    let judge = ScriptedJudge::new().with_audits(vec![Verdict::Yes]);

    let (judge, last_round) = run(judge, input().with_round(4).with_max_rounds(2)).await;

    assert_eq!(judge.audit_calls(), 1);
    assert_eq!(last_round, 4);
    assert!(judge.requests().iter().all(|r| r.context().round == 4));
}

#[tokio::test]
async fn test_audit_carried_into_next_round() {
    let judge = ScriptedJudge::new().with_audits(vec![Verdict::Yes, Verdict::No]);

    let (judge, _) = run(judge, input().with_max_rounds(2)).await;

    let requests = judge.requests();
    let (first, second) = requests.split_at(22);
    assert!(first.iter().all(|r| r.context().missing_errors.is_none()));
    for request in second {
        let carried = request.context().missing_errors.as_ref().unwrap();
        assert_eq!(carried.missing_errors_exists, Verdict::Yes);
        assert_eq!(carried.missing_error_types, vec!["fluency:grammar#0".to_string()]);
        assert_eq!(request.context().round, 2);
    }
}

#[tokio::test]
async fn test_each_round_runs_its_own_audit() {
    let judge = ScriptedJudge::new().with_audits(vec![Verdict::Yes, Verdict::No]);

    let (judge, _) = run(judge, input().with_max_rounds(2)).await;

    let audits: Vec<_> = judge
        .requests()
        .into_iter()
        .filter(|r| matches!(r, JudgmentRequest::Audit { .. }))
        .collect();
    assert_eq!(audits.len(), 2);
    assert_eq!(audits[1].context().round, 2);
}

//! End-to-end evaluation through the public pipeline API.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::float_cmp)]

use std::sync::Arc;
use std::time::Duration;

use mt_quality::engine::ExecutorConfig;
use mt_quality::error::{JudgeError, PipelineError};
use mt_quality::judge::{JudgmentKind, JudgmentRequest};
use mt_quality::metrics::MetricsCollector;
use mt_quality::model::{Category, EvaluationInput, SubCategory, Verdict};
use mt_quality::pipeline::Evaluator;
use mt_quality::scoring::QualityReport;
use pretty_assertions::assert_eq;

use super::common::ScriptedJudge;

fn input() -> EvaluationInput {
    EvaluationInput::new(
        "Le chat est sur la table.",
        "The cat is on table.",
        "The cat is on the table.",
    )
}

fn accuracy_scenario() -> ScriptedJudge {
    let mut judge = ScriptedJudge::new();
    judge.stage_two = [
        (SubCategory::Addition, (0.8, 100.0)),
        (SubCategory::Omission, (0.2, 50.0)),
        (SubCategory::Mistranslation, (0.0, 0.0)),
        (SubCategory::UntranslatedText, (0.0, 0.0)),
    ]
    .into_iter()
    .chain(
        SubCategory::ALL
            .into_iter()
            .filter(|s| s.category() != Category::Accuracy)
            .map(|s| (s, (0.0, 0.0))),
    )
    .collect();
    judge
}

#[tokio::test]
async fn test_confidence_weighted_category_without_verification_effect() {
    let mut judge = accuracy_scenario();
    judge.stage_three.insert(Category::Accuracy, (Verdict::Yes, 100.0));
    let evaluator = Evaluator::new(Arc::new(judge), ExecutorConfig::default()).unwrap();

    let state = evaluator.evaluate(input()).await.unwrap();
    let out = state.aggregation().unwrap();

    assert!((out.accuracy_error - 0.6).abs() < 1e-9);
    assert_eq!(out.fluency_error, 0.0);
    assert!((out.overall_error_probability - 0.24).abs() < 1e-9);
    assert!((out.final_quality_score_100 - 76.0).abs() < 1e-7);
}

#[tokio::test]
async fn test_verified_category_scaled_by_consistency() {
    let mut judge = accuracy_scenario();
    judge.stage_three.insert(Category::Accuracy, (Verdict::Yes, 80.0));
    let evaluator = Evaluator::new(Arc::new(judge), ExecutorConfig::default()).unwrap();

    let state = evaluator.evaluate(input()).await.unwrap();

    assert!((state.aggregation().unwrap().accuracy_error - 0.48).abs() < 1e-9);
}

#[tokio::test]
async fn test_all_zero_judgments_score_full_quality() {
    let mut judge = ScriptedJudge::new();
    judge.stage_two = SubCategory::ALL.into_iter().map(|s| (s, (0.0, 0.0))).collect();
    let evaluator = Evaluator::new(Arc::new(judge), ExecutorConfig::default()).unwrap();

    let state = evaluator.evaluate(input()).await.unwrap();
    let out = state.aggregation().unwrap();

    assert_eq!(out.overall_error_probability, 0.0);
    assert_eq!(out.final_quality_score_100, 100.0);
}

#[tokio::test]
async fn test_every_task_runs_once_per_round() {
    let judge = Arc::new(ScriptedJudge::new());
    let evaluator = Evaluator::new(Arc::clone(&judge), ExecutorConfig::default()).unwrap();

    evaluator.evaluate(input()).await.unwrap();

    let requests = judge.requests();
    assert_eq!(requests.len(), 22);
    let count = |kind| requests.iter().filter(|r| r.kind() == kind).count();
    assert_eq!(count(JudgmentKind::StageOne), 4);
    assert_eq!(count(JudgmentKind::StageTwo), 13);
    assert_eq!(count(JudgmentKind::StageThree), 4);
    assert_eq!(requests.last().map(JudgmentRequest::kind), Some(JudgmentKind::Audit));
}

#[tokio::test]
async fn test_stage_two_sees_its_category_stage_one() {
    let judge = Arc::new(ScriptedJudge::new());
    let evaluator = Evaluator::new(Arc::clone(&judge), ExecutorConfig::default()).unwrap();

    evaluator.evaluate(input()).await.unwrap();

    for request in judge.requests() {
        if let JudgmentRequest::StageTwo {
            sub_category,
            stage_one,
            ..
        } = request
        {
            let expected = format!(
                "stage one {}",
                Category::ALL
                    .iter()
                    .position(|c| *c == sub_category.category())
                    .unwrap()
            );
            assert_eq!(stage_one.reason, expected, "{sub_category}");
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_categories_progress_independently() {
    let judge = Arc::new(
        ScriptedJudge::new().with_delay("fluency/stage-one", Duration::from_millis(200)),
    );
    let evaluator = Evaluator::new(Arc::clone(&judge), ExecutorConfig::default()).unwrap();

    evaluator.evaluate(input()).await.unwrap();

    let timeline = judge.timeline();
    let at = |entry: &str| {
        timeline
            .iter()
            .position(|e| e == entry)
            .unwrap_or_else(|| panic!("{entry} missing from {timeline:?}"))
    };
    let slow_done = at("finish fluency/stage-one");
    for entry in [
        "start addition",
        "start untranslated_text",
        "start accuracy/stage-three",
        "finish accuracy/stage-three",
        "start awkward",
        "start style/stage-three",
    ] {
        assert!(at(entry) < slow_done, "{entry} waited for fluency/stage-one");
    }
    for entry in ["start grammar", "start fluency/stage-three", "start audit"] {
        assert!(at(entry) > slow_done, "{entry} ran before fluency/stage-one");
    }
}

#[tokio::test]
async fn test_report_views() {
    let mut judge = accuracy_scenario();
    judge.stage_three.insert(Category::Style, (Verdict::Yes, 60.0));
    let evaluator = Evaluator::new(Arc::new(judge), ExecutorConfig::default()).unwrap();

    let state = evaluator.evaluate(input()).await.unwrap();
    let report = QualityReport::from_state(&state);

    assert_eq!(report.breakdown.len(), 4);
    assert_eq!(report.breakdown[&Category::Fluency].len(), 6);
    assert_eq!(report.breakdown[&Category::Accuracy][&SubCategory::Addition], 0.8);
    assert_eq!(report.consistency[&Category::Style], 60.0);
    assert!(report.verified[&Category::Style]);
    assert!(!report.verified[&Category::Accuracy]);
    assert_eq!(report.aggregation, *state.aggregation().unwrap());
}

#[tokio::test]
async fn test_failure_names_task_and_round() {
    let mut judge = ScriptedJudge::new();
    judge.fail_on = Some("grammar".into());
    let evaluator = Evaluator::new(Arc::new(judge), ExecutorConfig::default()).unwrap();

    let err = evaluator.evaluate(input()).await.unwrap_err();

    assert_eq!(
        err,
        PipelineError::TaskFailed {
            task: "grammar".into(),
            round: 1,
            source: JudgeError::ApiUnavailable {
                message: "service unavailable".into()
            },
        }
    );
}

#[tokio::test]
async fn test_metrics_record_every_task() {
    let metrics = Arc::new(MetricsCollector::new());
    let evaluator = Evaluator::new(
        Arc::new(ScriptedJudge::new()),
        ExecutorConfig::default().with_metrics(Arc::clone(&metrics)),
    )
    .unwrap();

    evaluator.evaluate(input()).await.unwrap();

    let summary = metrics.summary();
    assert_eq!(summary.total_invocations, 22);
    assert_eq!(summary.overall_success_rate, 1.0);
    assert_eq!(summary.by_task["missing_errors_audit"].invocations, 1);
    assert_eq!(metrics.events_for_round(1).len(), 22);
}

#[tokio::test]
async fn test_state_serializes_wire_names() {
    let evaluator = Evaluator::new(Arc::new(ScriptedJudge::new()), ExecutorConfig::default()).unwrap();

    let state = evaluator.evaluate(input()).await.unwrap();
    let value = serde_json::to_value(&state).unwrap();

    assert!(value["run_id"].is_string());
    assert_eq!(value["stage_one"]["accuracy"]["probability"], 0.0);
    assert!(value["aggregation"]["final_quality_score_100"].is_number());
}

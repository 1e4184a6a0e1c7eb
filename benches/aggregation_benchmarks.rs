//! Scoring and pipeline benchmarks.
//!
//! Uses Criterion to measure aggregation over a filled state and one full
//! evaluation pass against an in-process judge.

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used, clippy::cast_precision_loss)]

use std::hint::black_box;
use std::sync::Arc;

use async_trait::async_trait;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use mt_quality::engine::{Blackboard, ExecutorConfig};
use mt_quality::error::JudgeError;
use mt_quality::judge::{Judgment, JudgmentRequest};
use mt_quality::model::{
    AuditResult, Category, EvaluationInput, StageOneResult, StageThreeResult, StageTwoResult,
    SubCategory, Verdict,
};
use mt_quality::pipeline::Evaluator;
use mt_quality::scoring::{aggregate, weighted_mean};
use mt_quality::state::{EvaluationState, SlotUpdate};
use mt_quality::traits::Judge;

fn stage_one(probability: f64) -> StageOneResult {
    StageOneResult {
        probability,
        reason: "bench".into(),
        confidence: 75.0,
    }
}

fn stage_two(prob: f64) -> StageTwoResult {
    StageTwoResult {
        re_evaluated_prob: prob,
        thoughts_on_stage1: "agree".into(),
        reason: "bench".into(),
        re_evaluated_confidence: 60.0 + prob * 40.0,
    }
}

fn stage_three(verdict: Verdict) -> StageThreeResult {
    StageThreeResult {
        consistency_score: 85.0,
        errors_exists: verdict,
        existance_reasoning: "bench".into(),
    }
}

/// A state with every slot filled.
fn filled_state() -> EvaluationState {
    let mut state = EvaluationState::new(EvaluationInput::new("source", "translation", "reference"));
    for (i, category) in Category::ALL.into_iter().enumerate() {
        state.merge(SlotUpdate::StageOne(category, stage_one(i as f64 / 4.0)));
        let verdict = if i % 2 == 0 { Verdict::Yes } else { Verdict::No };
        state.merge(SlotUpdate::StageThree(category, stage_three(verdict)));
    }
    for (i, sub) in SubCategory::ALL.into_iter().enumerate() {
        state.merge(SlotUpdate::StageTwo(sub, stage_two(i as f64 / 13.0)));
    }
    state
}

/// Answers every request instantly.
struct InstantJudge;

#[async_trait]
impl Judge for InstantJudge {
    async fn judge(&self, request: JudgmentRequest) -> Result<Judgment, JudgeError> {
        Ok(match request {
            JudgmentRequest::StageOne { .. } => Judgment::StageOne(stage_one(0.3)),
            JudgmentRequest::StageTwo { .. } => Judgment::StageTwo(stage_two(0.2)),
            JudgmentRequest::StageThree { .. } => Judgment::StageThree(stage_three(Verdict::Yes)),
            JudgmentRequest::Audit { .. } => Judgment::Audit(AuditResult {
                missing_errors_exists: Verdict::No,
                missing_error_types: Vec::new(),
                reasoning: "bench".into(),
            }),
        })
    }
}

fn bench_weighted_mean(c: &mut Criterion) {
    let mut group = c.benchmark_group("weighted_mean");

    for size in [1usize, 4, 6, 64] {
        let probs: Vec<f64> = (0..size).map(|i| i as f64 / size as f64).collect();
        let confs: Vec<f64> = (0..size).map(|i| (i * 7 % 100) as f64).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| weighted_mean(black_box(&probs), black_box(&confs)));
        });
    }

    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let state = filled_state();
    c.bench_function("aggregate_filled_state", |b| {
        b.iter(|| aggregate(black_box(&state)));
    });
}

fn bench_evaluation_pass(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("runtime");
    let mut group = c.benchmark_group("evaluation_pass");

    for concurrency in [1usize, 8, 22] {
        let evaluator = Evaluator::new(
            Arc::new(InstantJudge),
            ExecutorConfig::default().with_max_concurrency(concurrency),
        )
        .expect("graph builds");
        group.bench_with_input(
            BenchmarkId::from_parameter(concurrency),
            &concurrency,
            |b, _| {
                b.iter(|| {
                    let input = EvaluationInput::new("source", "translation", "reference");
                    runtime.block_on(evaluator.evaluate(black_box(input)))
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_weighted_mean, bench_aggregate, bench_evaluation_pass);
criterion_main!(benches);

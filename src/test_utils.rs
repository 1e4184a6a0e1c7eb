//! Test fixtures and mock factories.
//!
//! Only compiled for tests (`#[cfg(test)]`).

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::judge::{Judgment, JudgmentRequest};
use crate::model::{AuditResult, StageOneResult, StageThreeResult, StageTwoResult, Verdict};
use crate::traits::MockJudge;

/// Stage 1 result with a fixed reason.
#[must_use]
pub fn stage_one(probability: f64, confidence: f64) -> StageOneResult {
    StageOneResult {
        probability,
        reason: "fixture".into(),
        confidence,
    }
}

/// Stage 2 result with fixed commentary.
#[must_use]
pub fn stage_two(prob: f64, confidence: f64) -> StageTwoResult {
    StageTwoResult {
        re_evaluated_prob: prob,
        thoughts_on_stage1: "agree".into(),
        reason: "fixture".into(),
        re_evaluated_confidence: confidence,
    }
}

/// Stage 3 verification.
#[must_use]
pub fn stage_three(errors_exists: Verdict, consistency_score: f64) -> StageThreeResult {
    StageThreeResult {
        consistency_score,
        errors_exists,
        existance_reasoning: "fixture".into(),
    }
}

/// Audit verdict; `YES` lists one missing type.
#[must_use]
pub fn audit(missing: Verdict) -> AuditResult {
    AuditResult {
        missing_errors_exists: missing,
        missing_error_types: if missing.is_yes() {
            vec!["accuracy:omission".into()]
        } else {
            Vec::new()
        },
        reasoning: "fixture".into(),
    }
}

/// The clean answer for a stage request; audits answer `NO`.
#[must_use]
pub fn clean_judgment(request: &JudgmentRequest) -> Judgment {
    match request {
        JudgmentRequest::StageOne { .. } => Judgment::StageOne(stage_one(0.1, 90.0)),
        JudgmentRequest::StageTwo { .. } => Judgment::StageTwo(stage_two(0.1, 90.0)),
        JudgmentRequest::StageThree { .. } => Judgment::StageThree(stage_three(Verdict::No, 100.0)),
        JudgmentRequest::Audit { .. } => Judgment::Audit(audit(Verdict::No)),
    }
}

/// A mock judge giving every stage the clean answer and the audit the
/// given verdicts in order (the last one repeats).
///
/// Returns the mock and a counter of audit calls.
#[must_use]
pub fn scripted_judge(audits: Vec<Verdict>) -> (MockJudge, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut mock = MockJudge::new();
    mock.expect_judge().returning(move |request| {
        if let JudgmentRequest::Audit { .. } = request {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            let verdict = audits
                .get(n)
                .or_else(|| audits.last())
                .copied()
                .unwrap_or(Verdict::No);
            return Ok(Judgment::Audit(audit(verdict)));
        }
        Ok(clean_judgment(&request))
    });
    (mock, calls)
}

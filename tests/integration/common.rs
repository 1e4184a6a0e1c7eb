//! Shared fixtures: a deterministic judge whose answers depend only on the
//! request, with configurable per-task delays and audit verdicts.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::cast_precision_loss)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use mt_quality::error::JudgeError;
use mt_quality::judge::{Judgment, JudgmentRequest};
use mt_quality::model::{
    AuditResult, Category, StageOneResult, StageThreeResult, StageTwoResult, SubCategory, Verdict,
};
use mt_quality::traits::Judge;

/// Stable index of the task a request belongs to (0..22).
pub fn task_index(request: &JudgmentRequest) -> usize {
    let cat = |c: &Category| Category::ALL.iter().position(|x| x == c).unwrap();
    match request {
        JudgmentRequest::StageOne { category, .. } => cat(category),
        JudgmentRequest::StageTwo { sub_category, .. } => {
            4 + SubCategory::ALL
                .iter()
                .position(|x| x == sub_category)
                .unwrap()
        }
        JudgmentRequest::StageThree { category, .. } => 17 + cat(category),
        JudgmentRequest::Audit { .. } => 21,
    }
}

/// Deterministic judge for pipeline tests.
#[derive(Default)]
pub struct ScriptedJudge {
    /// Cooperative yields before answering, by task index.
    pub yields: Vec<usize>,
    /// Audit verdicts by round; the last one repeats. Empty means `NO`.
    pub audits: Vec<Verdict>,
    /// Fixed Stage 2 answers `(prob, confidence)`; others derive from the index.
    pub stage_two: HashMap<SubCategory, (f64, f64)>,
    /// Fixed Stage 3 answers; absent categories answer `NO` with 100.
    pub stage_three: HashMap<Category, (Verdict, f64)>,
    /// Task label that fails, if any.
    pub fail_on: Option<String>,
    /// Sleep before answering, by task label.
    pub delays: HashMap<String, Duration>,
    audit_calls: AtomicUsize,
    /// Every request received, in arrival order.
    pub log: Mutex<Vec<JudgmentRequest>>,
    /// `start <label>` and `finish <label>` entries in the order they happened.
    pub timeline: Mutex<Vec<String>>,
}

impl ScriptedJudge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_audits(mut self, audits: Vec<Verdict>) -> Self {
        self.audits = audits;
        self
    }

    pub fn with_yields(mut self, yields: Vec<usize>) -> Self {
        self.yields = yields;
        self
    }

    pub fn with_delay(mut self, label: &str, delay: Duration) -> Self {
        self.delays.insert(label.to_string(), delay);
        self
    }

    pub fn timeline(&self) -> Vec<String> {
        self.timeline.lock().unwrap().clone()
    }

    pub fn audit_calls(&self) -> usize {
        self.audit_calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<JudgmentRequest> {
        self.log.lock().unwrap().clone()
    }

    fn answer(&self, request: &JudgmentRequest) -> Result<Judgment, JudgeError> {
        let idx = task_index(request);
        Ok(match request {
            JudgmentRequest::StageOne { .. } => Judgment::StageOne(StageOneResult {
                probability: idx as f64 / 10.0,
                reason: format!("stage one {idx}"),
                confidence: 80.0,
            }),
            JudgmentRequest::StageTwo { sub_category, .. } => {
                let (prob, conf) = self
                    .stage_two
                    .get(sub_category)
                    .copied()
                    .unwrap_or((idx as f64 / 40.0, 40.0 + idx as f64));
                Judgment::StageTwo(StageTwoResult {
                    re_evaluated_prob: prob,
                    thoughts_on_stage1: "partly agree".into(),
                    reason: format!("stage two {idx}"),
                    re_evaluated_confidence: conf,
                })
            }
            JudgmentRequest::StageThree {
                category,
                stage_two,
                ..
            } => {
                if stage_two.len() != category.sub_categories().len() {
                    return Err(JudgeError::MissingField {
                        field: format!("{category} stage two results"),
                    });
                }
                let (verdict, consistency) = self
                    .stage_three
                    .get(category)
                    .copied()
                    .unwrap_or((Verdict::No, 100.0));
                Judgment::StageThree(StageThreeResult {
                    consistency_score: consistency,
                    errors_exists: verdict,
                    existance_reasoning: format!("stage three {idx}"),
                })
            }
            JudgmentRequest::Audit { prior, .. } => {
                let complete = prior.stage_one.values().all(Option::is_some)
                    && prior.stage_two.values().all(Option::is_some)
                    && prior.stage_three.values().all(Option::is_some);
                if !complete {
                    return Err(JudgeError::MissingField {
                        field: "audit prior outputs".into(),
                    });
                }
                let n = self.audit_calls.fetch_add(1, Ordering::SeqCst);
                let verdict = self
                    .audits
                    .get(n)
                    .or_else(|| self.audits.last())
                    .copied()
                    .unwrap_or(Verdict::No);
                Judgment::Audit(AuditResult {
                    missing_errors_exists: verdict,
                    missing_error_types: if verdict.is_yes() {
                        vec![format!("fluency:grammar#{n}")]
                    } else {
                        Vec::new()
                    },
                    reasoning: format!("audit {n}"),
                })
            }
        })
    }
}

#[async_trait]
impl Judge for ScriptedJudge {
    async fn judge(&self, request: JudgmentRequest) -> Result<Judgment, JudgeError> {
        let label = request.label();
        self.log.lock().unwrap().push(request.clone());
        self.timeline.lock().unwrap().push(format!("start {label}"));
        let idx = task_index(&request);
        for _ in 0..self.yields.get(idx).copied().unwrap_or(0) {
            tokio::task::yield_now().await;
        }
        if let Some(delay) = self.delays.get(&label) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail_on.as_deref() == Some(label.as_str()) {
            return Err(JudgeError::ApiUnavailable {
                message: "service unavailable".into(),
            });
        }
        let answer = self.answer(&request);
        self.timeline.lock().unwrap().push(format!("finish {label}"));
        answer
    }
}

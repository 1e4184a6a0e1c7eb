//! Requests to and replies from the judgment-task collaborator.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::JudgeError;
use crate::model::{
    AuditResult, Category, StageOneResult, StageThreeResult, StageTwoResult, SubCategory,
};
use crate::state::EvaluationState;

/// Pass context every judgment sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptContext {
    /// Source-language text.
    pub source: String,
    /// Machine translation under evaluation.
    pub translated: String,
    /// Human reference translation.
    pub reference: String,
    /// Current round.
    pub round: u32,
    /// Audit carried over from the previous round.
    pub missing_errors: Option<AuditResult>,
}

impl PromptContext {
    /// Build a context from its parts.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        translated: impl Into<String>,
        reference: impl Into<String>,
        round: u32,
        missing_errors: Option<AuditResult>,
    ) -> Self {
        Self {
            source: source.into(),
            translated: translated.into(),
            reference: reference.into(),
            round,
            missing_errors,
        }
    }
}

impl From<&EvaluationState> for PromptContext {
    fn from(state: &EvaluationState) -> Self {
        let input = state.input();
        Self::new(
            input.source.clone(),
            input.translated.clone(),
            input.reference.clone(),
            state.round(),
            state.missing_errors().cloned(),
        )
    }
}

/// Every Stage 1-3 slot as seen by the audit; absent slots are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct AuditContext {
    /// Stage 1 results keyed by category.
    pub stage_one: BTreeMap<Category, Option<StageOneResult>>,
    /// Stage 2 results keyed by sub-category.
    pub stage_two: BTreeMap<SubCategory, Option<StageTwoResult>>,
    /// Stage 3 results keyed by category.
    pub stage_three: BTreeMap<Category, Option<StageThreeResult>>,
}

impl From<&EvaluationState> for AuditContext {
    fn from(state: &EvaluationState) -> Self {
        Self {
            stage_one: Category::ALL
                .into_iter()
                .map(|c| (c, state.stage_one(c).cloned()))
                .collect(),
            stage_two: SubCategory::ALL
                .into_iter()
                .map(|s| (s, state.stage_two(s).cloned()))
                .collect(),
            stage_three: Category::ALL
                .into_iter()
                .map(|c| (c, state.stage_three(c).cloned()))
                .collect(),
        }
    }
}

/// The shape of a judgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JudgmentKind {
    /// [`StageOneResult`].
    StageOne,
    /// [`StageTwoResult`].
    StageTwo,
    /// [`StageThreeResult`].
    StageThree,
    /// [`AuditResult`].
    Audit,
}

impl fmt::Display for JudgmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::StageOne => "stage-one",
            Self::StageTwo => "stage-two",
            Self::StageThree => "stage-three",
            Self::Audit => "audit",
        })
    }
}

/// One call to the judgment collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum JudgmentRequest {
    /// Coarse judgment for a category.
    StageOne {
        /// Pass context.
        context: PromptContext,
        /// Category under evaluation.
        category: Category,
    },
    /// Re-evaluation of a sub-category.
    StageTwo {
        /// Pass context.
        context: PromptContext,
        /// Sub-category under evaluation.
        sub_category: SubCategory,
        /// Stage 1 result of the owning category.
        stage_one: StageOneResult,
    },
    /// Verification of a category.
    StageThree {
        /// Pass context.
        context: PromptContext,
        /// Category under verification.
        category: Category,
        /// Stage 1 result of the category.
        stage_one: StageOneResult,
        /// Present Stage 2 results of the category's sub-categories.
        stage_two: BTreeMap<SubCategory, StageTwoResult>,
    },
    /// Missing-error audit over all previous stages.
    Audit {
        /// Pass context.
        context: PromptContext,
        /// All Stage 1-3 slots.
        prior: AuditContext,
    },
}

impl JudgmentRequest {
    /// The pass context of the request.
    #[must_use]
    pub const fn context(&self) -> &PromptContext {
        match self {
            Self::StageOne { context, .. }
            | Self::StageTwo { context, .. }
            | Self::StageThree { context, .. }
            | Self::Audit { context, .. } => context,
        }
    }

    /// The result shape this request expects.
    #[must_use]
    pub const fn kind(&self) -> JudgmentKind {
        match self {
            Self::StageOne { .. } => JudgmentKind::StageOne,
            Self::StageTwo { .. } => JudgmentKind::StageTwo,
            Self::StageThree { .. } => JudgmentKind::StageThree,
            Self::Audit { .. } => JudgmentKind::Audit,
        }
    }

    /// Short label for logs, e.g. `fluency/stage-one` or `omission`.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::StageOne { category, .. } => format!("{category}/stage-one"),
            Self::StageTwo { sub_category, .. } => sub_category.to_string(),
            Self::StageThree { category, .. } => format!("{category}/stage-three"),
            Self::Audit { .. } => "audit".to_string(),
        }
    }
}

/// A structured reply from the judgment collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum Judgment {
    /// Stage 1 result.
    StageOne(StageOneResult),
    /// Stage 2 result.
    StageTwo(StageTwoResult),
    /// Stage 3 result.
    StageThree(StageThreeResult),
    /// Audit result.
    Audit(AuditResult),
}

impl Judgment {
    /// The shape of this judgment.
    #[must_use]
    pub const fn kind(&self) -> JudgmentKind {
        match self {
            Self::StageOne(_) => JudgmentKind::StageOne,
            Self::StageTwo(_) => JudgmentKind::StageTwo,
            Self::StageThree(_) => JudgmentKind::StageThree,
            Self::Audit(_) => JudgmentKind::Audit,
        }
    }

    fn mismatch(&self, expected: JudgmentKind) -> JudgeError {
        JudgeError::UnexpectedShape {
            expected: expected.to_string(),
            found: self.kind().to_string(),
        }
    }

    /// Unwrap a Stage 1 result.
    ///
    /// # Errors
    ///
    /// Returns [`JudgeError::UnexpectedShape`] for any other shape.
    pub fn into_stage_one(self) -> Result<StageOneResult, JudgeError> {
        match self {
            Self::StageOne(r) => Ok(r),
            other => Err(other.mismatch(JudgmentKind::StageOne)),
        }
    }

    /// Unwrap a Stage 2 result.
    ///
    /// # Errors
    ///
    /// Returns [`JudgeError::UnexpectedShape`] for any other shape.
    pub fn into_stage_two(self) -> Result<StageTwoResult, JudgeError> {
        match self {
            Self::StageTwo(r) => Ok(r),
            other => Err(other.mismatch(JudgmentKind::StageTwo)),
        }
    }

    /// Unwrap a Stage 3 result.
    ///
    /// # Errors
    ///
    /// Returns [`JudgeError::UnexpectedShape`] for any other shape.
    pub fn into_stage_three(self) -> Result<StageThreeResult, JudgeError> {
        match self {
            Self::StageThree(r) => Ok(r),
            other => Err(other.mismatch(JudgmentKind::StageThree)),
        }
    }

    /// Unwrap an audit result.
    ///
    /// # Errors
    ///
    /// Returns [`JudgeError::UnexpectedShape`] for any other shape.
    pub fn into_audit(self) -> Result<AuditResult, JudgeError> {
        match self {
            Self::Audit(r) => Ok(r),
            other => Err(other.mismatch(JudgmentKind::Audit)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::engine::Blackboard;
    use crate::model::{EvaluationInput, Verdict};
    use crate::state::SlotUpdate;

    fn audit() -> AuditResult {
        AuditResult {
            missing_errors_exists: Verdict::No,
            missing_error_types: Vec::new(),
            reasoning: "none".into(),
        }
    }

    #[test]
    fn test_shape_mismatch() {
        let err = Judgment::Audit(audit()).into_stage_one().unwrap_err();
        assert_eq!(
            err,
            JudgeError::UnexpectedShape {
                expected: "stage-one".into(),
                found: "audit".into(),
            }
        );
        assert!(Judgment::Audit(audit()).into_audit().is_ok());
    }

    #[test]
    fn test_context_from_state() {
        let mut state =
            EvaluationState::new(EvaluationInput::new("src", "mt", "ref").with_max_rounds(2));
        state.merge(SlotUpdate::Audit(audit()));
        state.begin_round(2);
        let context = PromptContext::from(&state);
        assert_eq!(context.source, "src");
        assert_eq!(context.translated, "mt");
        assert_eq!(context.round, 2);
        assert_eq!(context.missing_errors, Some(audit()));
    }

    #[test]
    fn test_audit_context_lists_every_slot() {
        let mut state = EvaluationState::new(EvaluationInput::new("s", "t", "r"));
        state.merge(SlotUpdate::StageOne(
            Category::Style,
            StageOneResult {
                probability: 0.1,
                reason: "r".into(),
                confidence: 10.0,
            },
        ));
        let prior = AuditContext::from(&state);
        assert_eq!(prior.stage_one.len(), 4);
        assert_eq!(prior.stage_two.len(), 13);
        assert_eq!(prior.stage_three.len(), 4);
        assert!(prior.stage_one[&Category::Style].is_some());
        assert!(prior.stage_one[&Category::Accuracy].is_none());

        let value = serde_json::to_value(&prior).unwrap();
        assert!(value["stage_one"]["accuracy"].is_null());
    }

    #[test]
    fn test_request_labels() {
        let context = PromptContext::new("s", "t", "r", 1, None);
        let request = JudgmentRequest::StageOne {
            context: context.clone(),
            category: Category::Fluency,
        };
        assert_eq!(request.label(), "fluency/stage-one");
        assert_eq!(request.kind(), JudgmentKind::StageOne);
        assert_eq!(request.context(), &context);
        let audit = JudgmentRequest::Audit {
            context,
            prior: AuditContext::default(),
        };
        assert_eq!(audit.label(), "audit");
    }
}

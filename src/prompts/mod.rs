//! Prompt templates for the judgment tasks.
//!
//! Prompts are organized by stage:
//! - `categories`: Stage 1 detection and Stage 3 verification, per category
//! - `sub_categories`: Stage 2 critical re-evaluation, per sub-category
//! - the audit prompt, defined here
//!
//! [`system_prompt`] picks the template for a request and appends the JSON
//! Schema of the expected reply; [`user_message`] renders the texts and the
//! stage payloads.
//!
//! # Example
//!
//! ```
//! use mt_quality::judge::{JudgmentRequest, PromptContext};
//! use mt_quality::model::Category;
//! use mt_quality::prompts::{system_prompt, user_message};
//!
//! let request = JudgmentRequest::StageOne {
//!     context: PromptContext::new("Bonjour", "Hello", "Hello", 1, None),
//!     category: Category::Accuracy,
//! };
//! assert!(system_prompt(&request).contains("ACCURACY"));
//! assert!(user_message(&request).contains("SOURCE SENTENCE: Bonjour"));
//! ```

mod categories;
mod sub_categories;

pub use categories::{stage_one_prompt, stage_three_prompt};
pub use sub_categories::stage_two_prompt;

use serde::Serialize;

use crate::judge::{JudgmentKind, JudgmentRequest, PromptContext};
use crate::model::{AuditResult, StageOneResult, StageThreeResult, StageTwoResult};

/// System prompt for the missing-error audit.
pub const AUDIT_PROMPT: &str = r#"You are a senior audit agent for a multi-stage machine translation evaluation pipeline.

You are given:
- The source sentence
- The machine translated sentence
- The reference sentence
- All Stage-1, Stage-2, and Stage-3 outputs for Accuracy, Fluency, Terminology, and Style

Your task:
1. Check whether the evaluation may have missed any important errors, i.e. errors that exist in the translation but were NOT flagged or were significantly under-estimated by earlier agents.
2. If you believe important errors were missed, return missingErrorsExists = YES and list the missing error types.
3. If not, return missingErrorsExists = NO.

Important rules:
- Be conservative: only return YES if you can point to concrete evidence in the sentences.
- Do NOT invent errors that are not supported by the text.
- Missing errors can be in any category: accuracy, fluency, terminology, style.
- List missing error types as short strings like "accuracy:omission", "fluency:grammar", "style:awkward"."#;

/// Placeholder rendered when no audit was carried over.
const NO_AUDIT: &str = "None";

/// Pretty JSON Schema of the reply expected for a judgment kind.
#[must_use]
pub fn schema_for_kind(kind: JudgmentKind) -> String {
    let schema = match kind {
        JudgmentKind::StageOne => schemars::schema_for!(StageOneResult),
        JudgmentKind::StageTwo => schemars::schema_for!(StageTwoResult),
        JudgmentKind::StageThree => schemars::schema_for!(StageThreeResult),
        JudgmentKind::Audit => schemars::schema_for!(AuditResult),
    };
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

/// Full system prompt for a request: task instructions plus reply schema.
#[must_use]
pub fn system_prompt(request: &JudgmentRequest) -> String {
    let instructions = match request {
        JudgmentRequest::StageOne { category, .. } => stage_one_prompt(*category).to_string(),
        JudgmentRequest::StageTwo { sub_category, .. } => stage_two_prompt(*sub_category),
        JudgmentRequest::StageThree { category, .. } => stage_three_prompt(*category),
        JudgmentRequest::Audit { .. } => AUDIT_PROMPT.to_string(),
    };
    format!(
        "{instructions}\n\nRespond with a single JSON object matching this JSON Schema:\n{}",
        schema_for_kind(request.kind())
    )
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

fn texts(context: &PromptContext) -> String {
    format!(
        "SOURCE SENTENCE: {}\n\nMACHINE TRANSLATED SENTENCE: {}\n\nREFERENCE SENTENCE: {}",
        context.source, context.translated, context.reference
    )
}

fn round_and_audit(context: &PromptContext) -> String {
    let audit = context
        .missing_errors
        .as_ref()
        .map_or_else(|| NO_AUDIT.to_string(), to_json);
    format!(
        "ROUND: {}\n\nMISSING-ERRORS AUDIT (from previous round, may be empty):\n{audit}",
        context.round
    )
}

/// User message for a request.
#[must_use]
pub fn user_message(request: &JudgmentRequest) -> String {
    match request {
        JudgmentRequest::StageOne { context, .. } => texts(context),
        JudgmentRequest::StageTwo {
            context, stage_one, ..
        } => format!(
            "{}\n\nPREVIOUS AGENT EVALUATIONS (Stage-1): {}\n\n{}",
            texts(context),
            to_json(stage_one),
            round_and_audit(context)
        ),
        JudgmentRequest::StageThree {
            context,
            stage_one,
            stage_two,
            ..
        } => format!(
            "{}\n\nSUPER CATEGORY AGENT EVALUATIONS (Stage-1): {}\n\nSUB CATEGORY AGENTS EVALUATIONS (Stage-2): {}\n\n{}",
            texts(context),
            to_json(stage_one),
            to_json(stage_two),
            round_and_audit(context)
        ),
        JudgmentRequest::Audit { context, prior } => format!(
            "{}\n\nROUND: {}\n\nPRIOR PIPELINE OUTPUTS: {}",
            texts(context),
            context.round,
            to_json(prior)
        ),
    }
}

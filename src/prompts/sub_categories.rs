//! Stage 2 prompts: a shared critical-reflection preamble plus one
//! definition per sub-category.

use crate::model::SubCategory;

const PREAMBLE: &str = r"You are a second-level expert evaluator in a hierarchical machine translation evaluation framework.

You are given:
1. The source sentence
2. The machine translated sentence
3. The reference sentence
4. The Stage-1 evaluation for a broad error category

Your job is NOT to blindly trust Stage-1. You must critically assess it for a specific sub-category only.

Important rules:
- Focus strictly on the assigned sub-category; do NOT evaluate other error types.
- If Stage-1 reasoning mentions issues outside your scope, ignore them.
- Use direct textual evidence from the sentences.
- Do not hallucinate missing or added content.
- Be conservative when unsure.";

/// Label and definition of a sub-category.
fn definition(sub: SubCategory) -> (&'static str, &'static str) {
    match sub {
        SubCategory::Addition => (
            "ADDITION",
            "An addition error occurs when the machine translation introduces information that does NOT exist in the source sentence. Paraphrasing or clarification is NOT addition unless new meaning is introduced.",
        ),
        SubCategory::Omission => (
            "OMISSION",
            "An omission error occurs when information present in the source sentence is missing in the machine translation.",
        ),
        SubCategory::Mistranslation => (
            "MISTRANSLATION",
            "A mistranslation occurs when meaning from the source is transferred incorrectly or distorted.",
        ),
        SubCategory::UntranslatedText => (
            "UNTRANSLATED TEXT",
            "An untranslated text error occurs when source-language words remain unchanged in the translation without justification.",
        ),
        SubCategory::Punctuation => (
            "PUNCTUATION",
            "Punctuation errors include incorrect, missing, or misplaced punctuation marks.",
        ),
        SubCategory::Spelling => (
            "SPELLING",
            "Spelling errors include orthographic mistakes in the target language.",
        ),
        SubCategory::Grammar => (
            "GRAMMAR",
            "Grammar errors include incorrect agreement, tense usage, word order, sentence structure, or syntactic violations.",
        ),
        SubCategory::Register => (
            "REGISTER",
            "Register errors occur when the tone or level of formality does not match the source context.",
        ),
        SubCategory::Inconsistency => (
            "INCONSISTENCY",
            "Internal inconsistency occurs when terms or references are used inconsistently within the translation itself.",
        ),
        SubCategory::CharacterEncoding => (
            "CHARACTER ENCODING",
            "Character encoding errors include corrupted characters, unreadable symbols, or encoding artifacts.",
        ),
        SubCategory::InappropriateForContext => (
            "INAPPROPRIATE FOR CONTEXT",
            "Inappropriate terminology occurs when domain-specific terms are translated in a way that does not fit the contextual or domain meaning.",
        ),
        SubCategory::InconsistentUse => (
            "INCONSISTENT USE",
            "Inconsistent use occurs when the same source term is translated differently within the translation.",
        ),
        SubCategory::Awkward => (
            "AWKWARD",
            "Awkward phrasing occurs when the translation sounds unnatural, clumsy, or stylistically inappropriate even if grammatically correct.",
        ),
    }
}

/// System prompt for the Stage 2 judgment of a sub-category.
#[must_use]
pub fn stage_two_prompt(sub: SubCategory) -> String {
    let (label, definition) = definition(sub);
    format!(
        r"{PREAMBLE}

You are evaluating {label} errors only.

Definition:
{definition}

Your tasks:
1. Identify concrete evidence of {label} errors in the translation.
2. Critically assess whether Stage-1 correctly identified such errors.
3. Explicitly state whether you agree or disagree with Stage-1.
4. Re-evaluate the probability specifically for {label} errors."
    )
}

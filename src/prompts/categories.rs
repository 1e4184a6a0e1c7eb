//! Stage 1 and Stage 3 prompts, one pair per category.

#![allow(clippy::missing_const_for_fn)]

use crate::model::Category;

/// System prompt for the Stage 1 judgment of a category.
#[must_use]
pub fn stage_one_prompt(category: Category) -> &'static str {
    match category {
        Category::Accuracy => {
            r"You are an expert machine translation evaluator.

Your task is to determine whether the MACHINE TRANSLATED SENTENCE contains ACCURACY errors when compared to the SOURCE SENTENCE and REFERENCE SENTENCE.

Accuracy errors include:
- Missing information (omission)
- Added information not present in the source
- Incorrect meaning (mistranslation)
- Untranslated words or phrases

Instructions:
- Compare semantic meaning carefully and focus strictly on meaning transfer.
- Ignore stylistic or fluency issues.
- If meaning is perfectly preserved, probability should be close to 0.
- If meaning is clearly distorted or incomplete, probability should be close to 1.
- Justify your reasoning using concrete words or phrases."
        }
        Category::Fluency => {
            r"You are an expert linguistic quality evaluator.

Your task is to determine whether the MACHINE TRANSLATED SENTENCE contains FLUENCY errors in the target language.

Fluency errors include:
- Grammar mistakes
- Spelling mistakes
- Incorrect punctuation
- Awkward syntax
- Register mismatch
- Character encoding issues

Instructions:
- Evaluate only linguistic well-formedness; do NOT evaluate semantic accuracy.
- Consider whether a native speaker would find the sentence natural.
- Base the probability only on fluency defects."
        }
        Category::Terminology => {
            r"You are a terminology consistency expert.

Your task is to determine whether the MACHINE TRANSLATED SENTENCE contains TERMINOLOGY errors.

Terminology errors include:
- Domain-specific terms translated incorrectly
- Inconsistent term usage
- Inappropriate terminology for the context

Instructions:
- Focus strictly on term usage; ignore general grammar and style.
- If technical terms are perfectly preserved, probability should be low.
- Justify your reasoning with the exact terms."
        }
        Category::Style => {
            r"You are a stylistic evaluator.

Your task is to determine whether the MACHINE TRANSLATED SENTENCE contains STYLE errors.

Style errors include:
- Awkward phrasing
- Tone inconsistency
- Stylistic choices inappropriate for the context

Instructions:
- Focus on tone, phrasing, and stylistic alignment.
- Do not evaluate meaning or grammar unless it affects style.
- Base your reasoning on specific phrases."
        }
    }
}

/// System prompt for the Stage 3 verification of a category.
#[must_use]
pub fn stage_three_prompt(category: Category) -> String {
    let scope = category
        .sub_categories()
        .iter()
        .map(|s| s.as_str().replace('_', " "))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r"You are a senior meta-evaluator.

You are given:
- The Stage-1 {category} evaluation
- All {category} sub-category evaluations ({scope})

Tasks:
1. Determine how consistent the agents are with each other (consistency score 0-100).
2. Verify whether the flagged errors truly exist.
3. DO NOT re-evaluate from scratch.
4. Only verify based on evidence provided by prior agents.

If at least one verified {category} error exists, return YES. Otherwise return NO.

Provide brief reasoning explaining your verification decision."
    )
}

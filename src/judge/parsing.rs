//! Parsing of model replies into typed judgments.
//!
//! Replies are expected to hold a single JSON object, but models sometimes
//! wrap it in a markdown code block or surround it with prose.
//! [`extract_json`] recovers the object in all of these cases; the
//! `parse_*` functions then deserialize and range-check it.

use serde::de::DeserializeOwned;

use super::request::{Judgment, JudgmentKind};
use crate::error::JudgeError;
use crate::model::{AuditResult, StageOneResult, StageThreeResult, StageTwoResult};

/// Maximum characters of a reply quoted in error messages.
const PREVIEW_LEN: usize = 100;

/// Extract JSON from a model reply.
///
/// Handles, in order:
/// 1. Raw JSON
/// 2. JSON wrapped in a ```` ```json ```` code block
/// 3. JSON wrapped in a generic ```` ``` ```` code block
/// 4. The first balanced `{...}` object embedded in prose
///
/// # Errors
///
/// Returns [`JudgeError::JsonParseFailed`] if no valid JSON can be extracted.
///
/// # Examples
///
/// ```
/// use mt_quality::judge::extract_json;
///
/// let json = extract_json(r#"{"probability": 0.5}"#).unwrap();
/// assert_eq!(json["probability"], 0.5);
///
/// let json = extract_json("Result: {\"reason\": \"ok\"} done").unwrap();
/// assert_eq!(json["reason"], "ok");
///
/// assert!(extract_json("not json").is_err());
/// ```
pub fn extract_json(text: &str) -> Result<serde_json::Value, JudgeError> {
    let trimmed = text.trim();

    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    if let Some(json_str) = extract_from_code_block(trimmed, "```json") {
        return parse_json_with_context(&json_str, text);
    }

    if let Some(json_str) = extract_from_code_block(trimmed, "```") {
        return parse_json_with_context(&json_str, text);
    }

    if let Some(json_str) = extract_balanced_object(trimmed) {
        return parse_json_with_context(&json_str, text);
    }

    Err(JudgeError::JsonParseFailed {
        message: format!(
            "No valid JSON found in response: {}",
            truncate_for_preview(text, PREVIEW_LEN)
        ),
    })
}

fn extract_from_code_block(text: &str, prefix: &str) -> Option<String> {
    let start_idx = text.find(prefix)?;
    let remaining = text[start_idx + prefix.len()..].trim_start();
    let end_idx = remaining.find("```")?;
    let json_str = remaining[..end_idx].trim();
    if json_str.is_empty() {
        return None;
    }
    Some(json_str.to_string())
}

/// First `{...}` with balanced braces, ignoring braces inside strings.
fn extract_balanced_object(text: &str) -> Option<String> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in text[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(text[start..=start + i].to_string());
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_json_with_context(json_str: &str, original: &str) -> Result<serde_json::Value, JudgeError> {
    serde_json::from_str(json_str).map_err(|e| JudgeError::JsonParseFailed {
        message: format!(
            "Failed to parse JSON: {e}. Preview: {}",
            truncate_for_preview(original, PREVIEW_LEN)
        ),
    })
}

fn truncate_for_preview(text: &str, max_len: usize) -> String {
    match text.char_indices().nth(max_len) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Deserialize a typed result, reporting missing fields by name.
fn from_json<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, JudgeError> {
    serde_json::from_value(value).map_err(|e| {
        let message = e.to_string();
        match message
            .strip_prefix("missing field `")
            .and_then(|rest| rest.split('`').next())
        {
            Some(field) => JudgeError::MissingField {
                field: field.to_string(),
            },
            None => JudgeError::JsonParseFailed { message },
        }
    })
}

fn check_range(field: &str, value: f64, max: f64) -> Result<(), JudgeError> {
    if (0.0..=max).contains(&value) {
        Ok(())
    } else {
        Err(JudgeError::InvalidValue {
            field: field.to_string(),
            reason: format!("must be between 0 and {max}, got {value}"),
        })
    }
}

/// Parse and validate a Stage 1 result.
///
/// # Errors
///
/// Returns [`JudgeError`] if the JSON is malformed, a field is missing, or
/// `probability` / `confidence` is out of range.
pub fn parse_stage_one(value: serde_json::Value) -> Result<StageOneResult, JudgeError> {
    let result: StageOneResult = from_json(value)?;
    check_range("probability", result.probability, 1.0)?;
    check_range("confidence", result.confidence, 100.0)?;
    Ok(result)
}

/// Parse and validate a Stage 2 result.
///
/// # Errors
///
/// Returns [`JudgeError`] if the JSON is malformed, a field is missing, or
/// a score is out of range.
pub fn parse_stage_two(value: serde_json::Value) -> Result<StageTwoResult, JudgeError> {
    let result: StageTwoResult = from_json(value)?;
    check_range("reEvaluatedProb", result.re_evaluated_prob, 1.0)?;
    check_range("reEvaluatedConfidence", result.re_evaluated_confidence, 100.0)?;
    Ok(result)
}

/// Parse and validate a Stage 3 result.
///
/// # Errors
///
/// Returns [`JudgeError`] if the JSON is malformed, a field is missing, or
/// `consistencyScore` is out of range.
pub fn parse_stage_three(value: serde_json::Value) -> Result<StageThreeResult, JudgeError> {
    let result: StageThreeResult = from_json(value)?;
    check_range("consistencyScore", result.consistency_score, 100.0)?;
    Ok(result)
}

/// Parse an audit result.
///
/// # Errors
///
/// Returns [`JudgeError`] if the JSON is malformed or a field is missing.
pub fn parse_audit(value: serde_json::Value) -> Result<AuditResult, JudgeError> {
    from_json(value)
}

/// Parse a reply of the given shape.
///
/// # Errors
///
/// Returns [`JudgeError`] if no JSON can be extracted or it does not satisfy
/// the schema of `kind`.
pub fn parse_judgment(kind: JudgmentKind, text: &str) -> Result<Judgment, JudgeError> {
    let value = extract_json(text)?;
    Ok(match kind {
        JudgmentKind::StageOne => Judgment::StageOne(parse_stage_one(value)?),
        JudgmentKind::StageTwo => Judgment::StageTwo(parse_stage_two(value)?),
        JudgmentKind::StageThree => Judgment::StageThree(parse_stage_three(value)?),
        JudgmentKind::Audit => Judgment::Audit(parse_audit(value)?),
    })
}

//! Judgment result records and the aggregation output.
//!
//! Judgment results use camelCase JSON field names so they round-trip with
//! the judgment service unchanged. Doc comments on the fields double as
//! descriptions in the generated JSON Schemas.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A YES/NO verdict as emitted by the judgment service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    /// The condition holds.
    Yes,
    /// The condition does not hold.
    No,
}

impl Verdict {
    /// Returns true for [`Verdict::Yes`].
    #[must_use]
    pub const fn is_yes(self) -> bool {
        matches!(self, Self::Yes)
    }
}

/// Stage 1: coarse judgment for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StageOneResult {
    /// Probability that an error of this category is present, between 0 and 1.
    pub probability: f64,
    /// Explanation pointing to the concrete words or phrases that justify the probability.
    pub reason: String,
    /// Confidence out of 100 that this error is present.
    pub confidence: f64,
}

/// Stage 2: re-evaluation of one sub-category given its category's Stage 1 result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StageTwoResult {
    /// Re-evaluated probability that this error is present, between 0 and 1.
    pub re_evaluated_prob: f64,
    /// Thoughts on the Stage 1 evaluation.
    pub thoughts_on_stage1: String,
    /// Concrete evidence for agreeing or disagreeing with Stage 1.
    pub reason: String,
    /// Confidence out of 100 that this error is present and the reasoning holds.
    pub re_evaluated_confidence: f64,
}

/// Stage 3: per-category verification over Stage 1 and Stage 2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StageThreeResult {
    /// How consistent the previous evaluations are with each other, out of 100.
    pub consistency_score: f64,
    /// Whether the flagged errors actually exist.
    pub errors_exists: Verdict,
    /// Brief explanation of the verification.
    pub existance_reasoning: String,
}

/// Audit: did the pipeline miss any error types?
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    /// Whether error types were missed by the previous stages.
    pub missing_errors_exists: Verdict,
    /// Missed error types as `category:subtype` strings.
    #[serde(default)]
    pub missing_error_types: Vec<String>,
    /// Explanation of the audit.
    pub reasoning: String,
}

/// Final aggregated scores. Derived only; never written by a judgment task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregationOutput {
    /// Damped error probability for accuracy.
    pub accuracy_error: f64,
    /// Damped error probability for fluency.
    pub fluency_error: f64,
    /// Damped error probability for terminology.
    pub terminology_error: f64,
    /// Damped error probability for style.
    pub style_error: f64,
    /// Weighted sum of the category errors.
    pub overall_error_probability: f64,
    /// `(1 - overall) * 100`.
    pub final_quality_score_100: f64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_stage_two_wire_names() {
        let result = StageTwoResult {
            re_evaluated_prob: 0.25,
            thoughts_on_stage1: "agree".into(),
            reason: "extra clause".into(),
            re_evaluated_confidence: 70.0,
        };
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "reEvaluatedProb": 0.25,
                "thoughtsOnStage1": "agree",
                "reason": "extra clause",
                "reEvaluatedConfidence": 70.0
            })
        );
    }

    #[test]
    fn test_stage_three_wire_names() {
        let value = json!({
            "consistencyScore": 80.0,
            "errorsExists": "YES",
            "existanceReasoning": "confirmed"
        });
        let result: StageThreeResult = serde_json::from_value(value).unwrap();
        assert_eq!(result.errors_exists, Verdict::Yes);
        assert_eq!(result.consistency_score, 80.0);
    }

    #[test]
    fn test_audit_missing_error_types_defaults_to_empty() {
        let result: AuditResult = serde_json::from_value(json!({
            "missingErrorsExists": "NO",
            "reasoning": "complete"
        }))
        .unwrap();
        assert!(result.missing_error_types.is_empty());
        assert!(!result.missing_errors_exists.is_yes());
    }

    #[test]
    fn test_verdict_rejects_lowercase() {
        assert!(serde_json::from_str::<Verdict>("\"yes\"").is_err());
    }

    #[test]
    fn test_aggregation_snake_case() {
        let out = AggregationOutput {
            accuracy_error: 0.1,
            fluency_error: 0.0,
            terminology_error: 0.0,
            style_error: 0.0,
            overall_error_probability: 0.04,
            final_quality_score_100: 96.0,
        };
        let value = serde_json::to_value(out).unwrap();
        assert_eq!(value["final_quality_score_100"], json!(96.0));
        assert_eq!(value["accuracy_error"], json!(0.1));
    }

    #[test]
    fn test_schema_lists_wire_fields() {
        let schema = serde_json::to_value(schemars::schema_for!(StageTwoResult)).unwrap();
        let props = schema["properties"].as_object().unwrap();
        assert!(props.contains_key("reEvaluatedProb"));
        assert!(props.contains_key("reEvaluatedConfidence"));
    }
}

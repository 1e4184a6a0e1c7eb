//! MQM-style penalty scoring over annotated error spans.
//!
//! Each annotated error deducts points by severity from a base score; the
//! result is clamped to 0..=100. This scorer works on explicit annotations
//! and is independent of the probability pipeline in [`super::aggregate`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of an annotated error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Renders the translation unusable.
    Critical,
    /// Changes meaning or badly hurts readability.
    Major,
    /// Noticeable but harmless.
    Minor,
    /// Flagged, no penalty.
    Neutral,
}

impl Severity {
    /// Infers the severity from free-text explanation keywords.
    ///
    /// Checks `critical`, then `major`, then `neutral`, case-insensitively.
    /// Anything else, including no explanation, is [`Severity::Minor`].
    #[must_use]
    pub fn from_explanation(explanation: Option<&str>) -> Self {
        let Some(text) = explanation else {
            return Self::Minor;
        };
        let text = text.to_lowercase();
        if text.contains("critical") {
            Self::Critical
        } else if text.contains("major") {
            Self::Major
        } else if text.contains("neutral") {
            Self::Neutral
        } else {
            Self::Minor
        }
    }
}

/// Points deducted per error of each severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MqmWeights {
    /// Critical deduction.
    pub critical: u32,
    /// Major deduction.
    pub major: u32,
    /// Minor deduction.
    pub minor: u32,
    /// Neutral deduction.
    pub neutral: u32,
}

impl Default for MqmWeights {
    fn default() -> Self {
        Self {
            critical: 25,
            major: 5,
            minor: 1,
            neutral: 0,
        }
    }
}

impl MqmWeights {
    /// Deduction for one error of `severity`.
    #[must_use]
    pub const fn deduction(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Critical => self.critical,
            Severity::Major => self.major,
            Severity::Minor => self.minor,
            Severity::Neutral => self.neutral,
        }
    }
}

/// One annotated error span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInstance {
    /// Offending text in the translation.
    pub span: String,
    /// Error subtype, e.g. `mistranslation`.
    pub subtype: String,
    /// Annotator confidence in 0..=1.
    pub confidence: f64,
    /// Free-text explanation; carries the severity keyword.
    #[serde(default)]
    pub explanation: Option<String>,
}

impl ErrorInstance {
    /// Severity inferred from the explanation.
    #[must_use]
    pub fn severity(&self) -> Severity {
        Severity::from_explanation(self.explanation.as_deref())
    }
}

impl fmt::Display for ErrorInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} (conf={:.2})",
            self.subtype, self.span, self.confidence
        )
    }
}

/// Error counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    /// Critical errors.
    pub critical: u32,
    /// Major errors.
    pub major: u32,
    /// Minor errors.
    pub minor: u32,
    /// Neutral errors.
    pub neutral: u32,
}

/// Outcome of [`MqmScorer::score`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MqmScore {
    /// `base - total_deductions`, clamped to 0..=100.
    pub final_score: u32,
    /// Sum of all deductions, unclamped.
    pub total_deductions: u32,
    /// Number of errors per severity.
    pub error_breakdown: SeverityCounts,
    /// Deductions per error subtype.
    pub category_breakdown: BTreeMap<String, u32>,
}

/// Severity-weighted penalty scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct MqmScorer {
    weights: MqmWeights,
}

impl MqmScorer {
    /// Default base score.
    pub const DEFAULT_BASE: u32 = 100;

    /// Creates a scorer with the standard 25/5/1/0 weights.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scorer with custom weights.
    #[must_use]
    pub const fn with_weights(weights: MqmWeights) -> Self {
        Self { weights }
    }

    /// Active weights.
    #[must_use]
    pub const fn weights(&self) -> MqmWeights {
        self.weights
    }

    /// Scores `errors` against [`Self::DEFAULT_BASE`].
    #[must_use]
    pub fn score(&self, errors: &[ErrorInstance]) -> MqmScore {
        self.score_from(errors, Self::DEFAULT_BASE)
    }

    /// Scores `errors` against `base`.
    #[must_use]
    pub fn score_from(&self, errors: &[ErrorInstance], base: u32) -> MqmScore {
        let mut counts = SeverityCounts::default();
        let mut category_breakdown = BTreeMap::new();
        let mut total: u32 = 0;

        for error in errors {
            let severity = error.severity();
            match severity {
                Severity::Critical => counts.critical += 1,
                Severity::Major => counts.major += 1,
                Severity::Minor => counts.minor += 1,
                Severity::Neutral => counts.neutral += 1,
            }
            let deduction = self.weights.deduction(severity);
            total = total.saturating_add(deduction);
            let entry = category_breakdown.entry(error.subtype.clone()).or_insert(0u32);
            *entry = entry.saturating_add(deduction);
        }

        MqmScore {
            final_score: base.saturating_sub(total).min(100),
            total_deductions: total,
            error_breakdown: counts,
            category_breakdown,
        }
    }
}

//! Evaluation input: the texts under evaluation and the round bounds.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One source/translation/reference triple plus optional loop bounds.
///
/// Immutable for the duration of a run. `round` and `max_rounds` that are
/// unset or zero are treated as 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationInput {
    /// Source-language text.
    pub source: String,
    /// Machine translation under evaluation.
    #[serde(alias = "mt")]
    pub translated: String,
    /// Human reference translation.
    pub reference: String,
    /// Starting round.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round: Option<u32>,
    /// Upper bound on the number of rounds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rounds: Option<u32>,
}

impl EvaluationInput {
    /// Create an input with default round bounds.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        translated: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            translated: translated.into(),
            reference: reference.into(),
            round: None,
            max_rounds: None,
        }
    }

    /// Set the starting round.
    #[must_use]
    pub const fn with_round(mut self, round: u32) -> Self {
        self.round = Some(round);
        self
    }

    /// Set the maximum number of rounds.
    #[must_use]
    pub const fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }

    /// Starting round, normalized to at least 1.
    #[must_use]
    pub fn start_round(&self) -> u32 {
        normalize(self.round)
    }

    /// Maximum number of rounds, normalized to at least 1.
    #[must_use]
    pub fn round_limit(&self) -> u32 {
        normalize(self.max_rounds)
    }

    /// Load an input from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InputUnreadable`] if the file cannot be read or
    /// does not hold a valid input object.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let unreadable = |message: String| ConfigError::InputUnreadable {
            path: path.display().to_string(),
            message,
        };
        let raw = std::fs::read_to_string(path).map_err(|e| unreadable(e.to_string()))?;
        serde_json::from_str(&raw).map_err(|e| unreadable(e.to_string()))
    }
}

fn normalize(value: Option<u32>) -> u32 {
    value.filter(|v| *v > 0).unwrap_or(1)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use std::io::Write;
    use test_case::test_case;

    #[test_case(None, 1; "unset")]
    #[test_case(Some(0), 1; "zero")]
    #[test_case(Some(1), 1; "one")]
    #[test_case(Some(3), 3; "three")]
    fn test_round_normalization(value: Option<u32>, expected: u32) {
        let mut input = EvaluationInput::new("s", "t", "r");
        input.round = value;
        input.max_rounds = value;
        assert_eq!(input.start_round(), expected);
        assert_eq!(input.round_limit(), expected);
    }

    #[test]
    fn test_accepts_mt_alias() {
        let input: EvaluationInput = serde_json::from_str(
            r#"{"source":"Hallo","mt":"Hello","reference":"Hi","max_rounds":2}"#,
        )
        .unwrap();
        assert_eq!(input.translated, "Hello");
        assert_eq!(input.round_limit(), 2);
        assert_eq!(input.round, None);
    }

    #[test]
    fn test_from_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"source":"a","translated":"b","reference":"c","round":1}}"#
        )
        .unwrap();
        let input = EvaluationInput::from_path(file.path()).unwrap();
        assert_eq!(input, EvaluationInput::new("a", "b", "c").with_round(1));
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = EvaluationInput::from_path(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::InputUnreadable { .. }));
    }

    #[test]
    fn test_from_path_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"source":"a"}}"#).unwrap();
        let err = EvaluationInput::from_path(file.path()).unwrap_err();
        match err {
            ConfigError::InputUnreadable { message, .. } => {
                assert!(message.contains("translated"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

//! Round loop decision.

use crate::model::AuditResult;

/// What the driver does after a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopDecision {
    /// Run another round with the audit carried as context.
    Continue,
    /// Stop and aggregate.
    Finish,
}

/// Decide whether another round runs.
///
/// Continues only when the audit reports missing errors and the round
/// limit has not been reached.
#[must_use]
pub fn decide(round: u32, max_rounds: u32, audit: Option<&AuditResult>) -> LoopDecision {
    let missing = audit.is_some_and(|a| a.missing_errors_exists.is_yes());
    if missing && round < max_rounds {
        LoopDecision::Continue
    } else {
        LoopDecision::Finish
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Verdict;
    use test_case::test_case;

    fn audit(verdict: Verdict) -> AuditResult {
        AuditResult {
            missing_errors_exists: verdict,
            missing_error_types: Vec::new(),
            reasoning: String::new(),
        }
    }

    #[test_case(1, 3, Verdict::Yes, LoopDecision::Continue)]
    #[test_case(2, 3, Verdict::Yes, LoopDecision::Continue)]
    #[test_case(3, 3, Verdict::Yes, LoopDecision::Finish)]
    #[test_case(1, 1, Verdict::Yes, LoopDecision::Finish)]
    #[test_case(5, 2, Verdict::Yes, LoopDecision::Finish)]
    #[test_case(1, 3, Verdict::No, LoopDecision::Finish)]
    fn test_decide(round: u32, max_rounds: u32, verdict: Verdict, expected: LoopDecision) {
        assert_eq!(decide(round, max_rounds, Some(&audit(verdict))), expected);
    }

    #[test]
    fn test_no_audit_finishes() {
        assert_eq!(decide(1, 5, None), LoopDecision::Finish);
    }
}

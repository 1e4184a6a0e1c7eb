//! Evaluation driver.
//!
//! [`Evaluator::evaluate`] runs the judgment graph once per round, carries
//! the audit of each round into the next, stops on a clean audit or at the
//! round limit, and aggregates the final state.

mod controller;
mod tasks;

pub use controller::{decide, LoopDecision};
pub use tasks::{build_graph, task_name, AUDIT_TASK};

use std::sync::Arc;
use std::time::Instant;

use crate::engine::{ExecutorConfig, GraphExecutor};
use crate::error::PipelineError;
use crate::model::EvaluationInput;
use crate::scoring::aggregate;
use crate::state::EvaluationState;
use crate::traits::Judge;

/// Runs complete evaluations against a judge.
#[derive(Debug)]
pub struct Evaluator {
    executor: GraphExecutor<EvaluationState>,
}

impl Evaluator {
    /// Build the evaluation graph over a judge.
    ///
    /// # Errors
    ///
    /// Returns a construction error if the graph is inconsistent.
    pub fn new<J>(judge: Arc<J>, config: ExecutorConfig) -> Result<Self, PipelineError>
    where
        J: Judge + ?Sized + 'static,
    {
        let graph = build_graph(judge)?;
        Ok(Self {
            executor: GraphExecutor::new(graph, config),
        })
    }

    /// The underlying executor.
    #[must_use]
    pub const fn executor(&self) -> &GraphExecutor<EvaluationState> {
        &self.executor
    }

    /// Evaluate one translation.
    ///
    /// At most `max_rounds - round + 1` passes run; when the requested start
    /// round already exceeds the limit, exactly one pass runs.
    ///
    /// # Errors
    ///
    /// Returns the first task failure, naming the task and the round.
    pub async fn evaluate(&self, input: EvaluationInput) -> Result<EvaluationState, PipelineError> {
        let start = Instant::now();
        let mut state = EvaluationState::new(input);
        let run_id = state.run_id();
        let first = state.round();
        let last = state.max_rounds().max(first);

        tracing::info!(
            run_id = %run_id,
            round = first,
            max_rounds = state.max_rounds(),
            "Starting evaluation"
        );

        for round in first..=last {
            state.begin_round(round);
            state = self.executor.run(state, round).await.inspect_err(|e| {
                tracing::warn!(run_id = %run_id, round, error = %e, "Evaluation aborted");
            })?;

            let decision = decide(round, state.max_rounds(), state.audit());
            tracing::info!(
                run_id = %run_id,
                round,
                missing_errors = state.audit().is_some_and(|a| a.missing_errors_exists.is_yes()),
                decision = ?decision,
                "Round complete"
            );
            if decision == LoopDecision::Finish {
                break;
            }
        }

        let aggregation = aggregate(&state);
        state.set_aggregation(aggregation);

        tracing::info!(
            run_id = %run_id,
            rounds = state.round() - first + 1,
            overall_error_probability = aggregation.overall_error_probability,
            final_quality_score_100 = aggregation.final_quality_score_100,
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Evaluation complete"
        );

        Ok(state)
    }
}

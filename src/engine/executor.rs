use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::stream::{FuturesUnordered, StreamExt};

use super::{Blackboard, TaskGraph};
use crate::error::{JudgeError, PipelineError};
use crate::metrics::{MetricsCollector, TaskEvent};

/// Executor tuning.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum number of tasks in flight at once; `None` starts every ready
    /// task immediately.
    pub max_concurrency: Option<usize>,
    /// Per-task time limit.
    pub task_timeout: Option<Duration>,
    /// Sink for per-task latency and outcome events.
    pub metrics: Option<Arc<MetricsCollector>>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_concurrency: None,
            task_timeout: None,
            metrics: None,
        }
    }
}

impl ExecutorConfig {
    /// Set the concurrency bound; values below 1 are raised to 1.
    #[must_use]
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = Some(max_concurrency.max(1));
        self
    }

    /// Set a per-task timeout.
    #[must_use]
    pub const fn with_task_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout = Some(timeout);
        self
    }

    /// Attach a metrics collector.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

enum Outcome<U> {
    Done(Result<Vec<U>, JudgeError>),
    TimedOut(Duration),
}

/// Runs passes of a [`TaskGraph`] over a [`Blackboard`].
#[derive(Debug)]
pub struct GraphExecutor<S: Blackboard> {
    graph: TaskGraph<S>,
    config: ExecutorConfig,
}

impl<S: Blackboard> GraphExecutor<S> {
    /// Create an executor for a validated graph.
    #[must_use]
    pub const fn new(graph: TaskGraph<S>, config: ExecutorConfig) -> Self {
        Self { graph, config }
    }

    /// The graph this executor runs.
    #[must_use]
    pub const fn graph(&self) -> &TaskGraph<S> {
        &self.graph
    }

    /// Executor configuration.
    #[must_use]
    pub const fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Run one pass of the graph.
    ///
    /// All slots the graph produces are cleared first, then re-produced.
    /// Tasks start as soon as their producers have merged, in declaration
    /// order among those ready. With a `max_concurrency` bound, at most that
    /// many run at once.
    /// Updates are merged as each task completes.
    ///
    /// # Errors
    ///
    /// The first task failure, timeout or undeclared write aborts the pass;
    /// tasks still in flight are dropped.
    pub async fn run(&self, mut state: S, round: u32) -> Result<S, PipelineError> {
        let graph = &self.graph;
        let limit = self.config.max_concurrency.map_or(usize::MAX, |n| n.max(1));
        let pass_start = Instant::now();

        state.clear(graph.output_slots());

        let mut pending: Vec<usize> = graph.deps.iter().map(Vec::len).collect();
        let mut ready: BTreeSet<usize> = (0..graph.len()).filter(|&i| pending[i] == 0).collect();
        let mut in_flight = FuturesUnordered::new();
        let mut finished = 0;

        while finished < graph.len() {
            while in_flight.len() < limit {
                let Some(idx) = ready.pop_first() else { break };
                in_flight.push(self.start(idx, &state, round));
            }

            let Some((idx, outcome, elapsed)) = in_flight.next().await else {
                break;
            };
            let task = &graph.tasks[idx];
            let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

            let updates = match outcome {
                Outcome::Done(Ok(updates)) => updates,
                Outcome::Done(Err(source)) => {
                    self.record(&task.name, round, elapsed_ms, false);
                    tracing::warn!(
                        task = %task.name,
                        round,
                        elapsed_ms,
                        error = %source,
                        "Task failed, aborting pass"
                    );
                    return Err(PipelineError::TaskFailed {
                        task: task.name.clone(),
                        round,
                        source,
                    });
                }
                Outcome::TimedOut(timeout) => {
                    self.record(&task.name, round, elapsed_ms, false);
                    let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                    tracing::warn!(task = %task.name, round, timeout_ms, "Task timed out, aborting pass");
                    return Err(PipelineError::TaskTimedOut {
                        task: task.name.clone(),
                        round,
                        timeout_ms,
                    });
                }
            };

            for update in updates {
                let slot = S::slot_of(&update);
                if !task.writes.contains(&slot) {
                    self.record(&task.name, round, elapsed_ms, false);
                    return Err(PipelineError::UndeclaredWrite {
                        task: task.name.clone(),
                        slot: slot.to_string(),
                        round,
                    });
                }
                state.merge(update);
            }

            self.record(&task.name, round, elapsed_ms, true);
            tracing::debug!(task = %task.name, round, elapsed_ms, "Task finished");

            finished += 1;
            for &dependent in &graph.dependents[idx] {
                pending[dependent] -= 1;
                if pending[dependent] == 0 {
                    ready.insert(dependent);
                }
            }
        }

        tracing::debug!(
            round,
            tasks = finished,
            elapsed_ms = u64::try_from(pass_start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Pass complete"
        );
        Ok(state)
    }

    fn start(
        &self,
        idx: usize,
        state: &S,
        round: u32,
    ) -> impl Future<Output = (usize, Outcome<S::Update>, Duration)> + Send + 'static {
        let task = &self.graph.tasks[idx];
        tracing::debug!(task = %task.name, round, "Task started");

        let work = (task.run)(state.project(&task.reads));
        let timeout = self.config.task_timeout;
        async move {
            let started = Instant::now();
            let outcome = match timeout {
                Some(limit) => tokio::time::timeout(limit, work)
                    .await
                    .map_or(Outcome::TimedOut(limit), Outcome::Done),
                None => Outcome::Done(work.await),
            };
            (idx, outcome, started.elapsed())
        }
    }

    fn record(&self, task: &str, round: u32, latency_ms: u64, success: bool) {
        if let Some(metrics) = &self.config.metrics {
            metrics.record(TaskEvent::new(task, round, latency_ms, success));
        }
    }
}

//! Per-task metrics collection.
//!
//! This module provides:
//! - Latency measurements per judgment task
//! - Success/failure rates
//! - Per-round event queries
//!
//! # Example
//!
//! ```
//! use mt_quality::metrics::{MetricsCollector, TaskEvent};
//!
//! let metrics = MetricsCollector::new();
//! metrics.record(TaskEvent::new("accuracy_stage1", 1, 150, true));
//! metrics.record(TaskEvent::new("accuracy_stage1", 2, 250, true));
//! metrics.record(TaskEvent::new("omission", 1, 300, false));
//!
//! let summary = metrics.summary();
//! assert_eq!(summary.total_invocations, 3);
//! assert!((summary.overall_success_rate - 0.666).abs() < 0.01);
//! assert_eq!(summary.by_task["accuracy_stage1"].max_latency_ms, 250);
//! ```

#![allow(clippy::cast_precision_loss)]

use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single finished or failed task execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEvent {
    /// Task name.
    pub task: String,
    /// Round the task ran in.
    pub round: u32,
    /// Latency in milliseconds.
    pub latency_ms: u64,
    /// Whether the task succeeded.
    pub success: bool,
    /// When the task finished.
    pub timestamp: DateTime<Utc>,
}

impl TaskEvent {
    /// Create a new task event stamped with the current time.
    #[must_use]
    pub fn new(task: impl Into<String>, round: u32, latency_ms: u64, success: bool) -> Self {
        Self {
            task: task.into(),
            round,
            latency_ms,
            success,
            timestamp: Utc::now(),
        }
    }
}

/// Summary statistics for one task.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TaskSummary {
    /// Total invocations across rounds.
    pub invocations: u64,
    /// Failed invocations.
    pub failures: u64,
    /// Average latency in milliseconds.
    pub avg_latency_ms: f64,
    /// Minimum latency in milliseconds.
    pub min_latency_ms: u64,
    /// Maximum latency in milliseconds.
    pub max_latency_ms: u64,
    /// Success rate (0.0-1.0).
    pub success_rate: f64,
}

/// Overall metrics summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricsSummary {
    /// Total invocations across all tasks.
    pub total_invocations: u64,
    /// Overall success rate; 1.0 when nothing was recorded.
    pub overall_success_rate: f64,
    /// Per-task summaries keyed by task name.
    pub by_task: BTreeMap<String, TaskSummary>,
}

/// Thread-safe metrics collector.
#[derive(Debug, Default)]
pub struct MetricsCollector {
    events: RwLock<Vec<TaskEvent>>,
}

impl MetricsCollector {
    /// Create a new metrics collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a task event.
    pub fn record(&self, event: TaskEvent) {
        match self.events.write() {
            Ok(mut events) => events.push(event),
            Err(poison_error) => {
                tracing::error!(
                    task = %event.task,
                    error = %poison_error,
                    "Failed to record task event: RwLock poisoned"
                );
            }
        }
    }

    fn snapshot(&self) -> Vec<TaskEvent> {
        match self.events.read() {
            Ok(e) => e.clone(),
            Err(poison_error) => {
                tracing::warn!(
                    error = %poison_error,
                    "Reading events from poisoned lock, using recovered data"
                );
                poison_error.into_inner().clone()
            }
        }
    }

    /// Get summary statistics.
    #[must_use]
    pub fn summary(&self) -> MetricsSummary {
        let events = self.snapshot();

        let mut grouped: BTreeMap<String, Vec<&TaskEvent>> = BTreeMap::new();
        for event in &events {
            grouped.entry(event.task.clone()).or_default().push(event);
        }

        let by_task = grouped
            .into_iter()
            .map(|(task, task_events)| {
                let invocations = task_events.len() as u64;
                let failures = task_events.iter().filter(|e| !e.success).count() as u64;
                let latencies: Vec<u64> = task_events.iter().map(|e| e.latency_ms).collect();
                let avg_latency_ms = if latencies.is_empty() {
                    0.0
                } else {
                    latencies.iter().sum::<u64>() as f64 / latencies.len() as f64
                };
                let success_rate = if invocations > 0 {
                    (invocations - failures) as f64 / invocations as f64
                } else {
                    0.0
                };
                (
                    task,
                    TaskSummary {
                        invocations,
                        failures,
                        avg_latency_ms,
                        min_latency_ms: latencies.iter().copied().min().unwrap_or(0),
                        max_latency_ms: latencies.iter().copied().max().unwrap_or(0),
                        success_rate,
                    },
                )
            })
            .collect();

        let total_invocations = events.len() as u64;
        let total_successful = events.iter().filter(|e| e.success).count() as u64;
        let overall_success_rate = if total_invocations > 0 {
            total_successful as f64 / total_invocations as f64
        } else {
            1.0
        };

        MetricsSummary {
            total_invocations,
            overall_success_rate,
            by_task,
        }
    }

    /// Get the events recorded for one round.
    #[must_use]
    pub fn events_for_round(&self, round: u32) -> Vec<TaskEvent> {
        self.events
            .read()
            .map(|events| events.iter().filter(|e| e.round == round).cloned().collect())
            .unwrap_or_default()
    }

    /// Get total number of recorded invocations.
    #[must_use]
    pub fn total_invocations(&self) -> u64 {
        self.events
            .read()
            .map(|events| events.len() as u64)
            .unwrap_or(0)
    }

    /// Clear all metrics.
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.write() {
            events.clear();
        }
    }
}

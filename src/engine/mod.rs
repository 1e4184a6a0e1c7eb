//! Generic task graph engine.
//!
//! A [`TaskGraph`] is a static, validated set of [`TaskSpec`]s whose
//! dependencies are derived from the slots they read and write. A
//! [`GraphExecutor`] runs one pass of the graph over a [`Blackboard`]:
//! every task starts as soon as the producers of its inputs have merged,
//! sees only a projection holding the slots it declared, and returns
//! updates that the executor merges as each task completes.
//!
//! The engine knows nothing about translation quality; the pipeline
//! module supplies the concrete blackboard and tasks.

mod executor;
mod graph;

use std::fmt::{Debug, Display};
use std::hash::Hash;

pub use executor::{ExecutorConfig, GraphExecutor};
pub use graph::{TaskFn, TaskGraph, TaskSpec};

/// Shared state that tasks read from and write to through named slots.
pub trait Blackboard: Clone + Send + Sync + 'static {
    /// Identifier of a single output slot.
    type Slot: Copy + Eq + Ord + Hash + Display + Debug + Send + Sync + 'static;

    /// A value destined for exactly one slot.
    type Update: Send + 'static;

    /// Return a copy holding only the pass context and the given slots.
    #[must_use]
    fn project(&self, reads: &[Self::Slot]) -> Self;

    /// The slot an update targets.
    fn slot_of(update: &Self::Update) -> Self::Slot;

    /// Write an update into its slot, replacing any previous value.
    fn merge(&mut self, update: Self::Update);

    /// Empty the given slots.
    fn clear(&mut self, slots: &[Self::Slot]);
}

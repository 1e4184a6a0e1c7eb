use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt};

use super::Blackboard;
use crate::error::{JudgeError, PipelineError};

/// Type-erased task body: takes a projection, returns slot updates.
pub type TaskFn<S> = Arc<
    dyn Fn(S) -> BoxFuture<'static, Result<Vec<<S as Blackboard>::Update>, JudgeError>>
        + Send
        + Sync,
>;

/// Declaration of a single task: its name, the slots it reads and writes,
/// and the async function that does the work.
pub struct TaskSpec<S: Blackboard> {
    pub(crate) name: String,
    pub(crate) reads: Vec<S::Slot>,
    pub(crate) writes: Vec<S::Slot>,
    pub(crate) run: TaskFn<S>,
}

impl<S: Blackboard> TaskSpec<S> {
    /// Declare a task.
    pub fn new<F, Fut>(
        name: impl Into<String>,
        reads: Vec<S::Slot>,
        writes: Vec<S::Slot>,
        run: F,
    ) -> Self
    where
        F: Fn(S) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<S::Update>, JudgeError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            reads,
            writes,
            run: Arc::new(move |view: S| run(view).boxed()),
        }
    }

    /// Task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Slots this task reads.
    #[must_use]
    pub fn reads(&self) -> &[S::Slot] {
        &self.reads
    }

    /// Slots this task writes.
    #[must_use]
    pub fn writes(&self) -> &[S::Slot] {
        &self.writes
    }
}

impl<S: Blackboard> fmt::Debug for TaskSpec<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskSpec")
            .field("name", &self.name)
            .field("reads", &self.reads)
            .field("writes", &self.writes)
            .finish_non_exhaustive()
    }
}

/// A validated, acyclic task graph.
///
/// Each output slot has exactly one producer, and a task depends on the
/// producer of every slot it reads.
pub struct TaskGraph<S: Blackboard> {
    pub(crate) tasks: Vec<TaskSpec<S>>,
    pub(crate) deps: Vec<Vec<usize>>,
    pub(crate) dependents: Vec<Vec<usize>>,
    outputs: Vec<S::Slot>,
}

impl<S: Blackboard> TaskGraph<S> {
    /// Validate the task declarations and derive the dependency edges.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::DuplicateTask`] if two tasks share a name
    /// - [`PipelineError::DuplicateProducer`] if two tasks write the same slot
    /// - [`PipelineError::MissingProducer`] if a task reads a slot nobody writes
    /// - [`PipelineError::CircularDependency`] if the edges form a cycle
    pub fn new(tasks: Vec<TaskSpec<S>>) -> Result<Self, PipelineError> {
        let mut names = HashSet::new();
        for task in &tasks {
            if !names.insert(task.name.as_str()) {
                return Err(PipelineError::DuplicateTask {
                    task: task.name.clone(),
                });
            }
        }

        let mut producers: BTreeMap<S::Slot, usize> = BTreeMap::new();
        let mut outputs = Vec::new();
        for (idx, task) in tasks.iter().enumerate() {
            for slot in &task.writes {
                if let Some(&first) = producers.get(slot) {
                    return Err(PipelineError::DuplicateProducer {
                        slot: slot.to_string(),
                        first: tasks[first].name.clone(),
                        second: task.name.clone(),
                    });
                }
                producers.insert(*slot, idx);
                outputs.push(*slot);
            }
        }

        let mut deps = Vec::with_capacity(tasks.len());
        let mut dependents = vec![Vec::new(); tasks.len()];
        for (idx, task) in tasks.iter().enumerate() {
            let mut task_deps = BTreeSet::new();
            for slot in &task.reads {
                let producer =
                    producers
                        .get(slot)
                        .copied()
                        .ok_or_else(|| PipelineError::MissingProducer {
                            task: task.name.clone(),
                            slot: slot.to_string(),
                        })?;
                task_deps.insert(producer);
            }
            for &dep in &task_deps {
                dependents[dep].push(idx);
            }
            deps.push(task_deps.into_iter().collect::<Vec<_>>());
        }

        if let Some(cycle) = find_cycle(&deps) {
            let path: Vec<&str> = cycle.iter().map(|&i| tasks[i].name.as_str()).collect();
            return Err(PipelineError::CircularDependency {
                cycle: path.join(" -> "),
            });
        }

        Ok(Self {
            tasks,
            deps,
            dependents,
            outputs,
        })
    }

    /// Number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the graph has no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks in declaration order.
    #[must_use]
    pub fn tasks(&self) -> &[TaskSpec<S>] {
        &self.tasks
    }

    /// Every slot produced by some task, in declaration order.
    #[must_use]
    pub fn output_slots(&self) -> &[S::Slot] {
        &self.outputs
    }

    /// Names of the tasks the named task waits on, or `None` for an unknown task.
    #[must_use]
    pub fn dependencies(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.tasks.iter().position(|t| t.name == name)?;
        Some(
            self.deps[idx]
                .iter()
                .map(|&d| self.tasks[d].name.as_str())
                .collect(),
        )
    }
}

impl<S: Blackboard> fmt::Debug for TaskGraph<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskGraph")
            .field("tasks", &self.tasks)
            .field("outputs", &self.outputs)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

/// Depth-first search for a cycle; returns the path with the first node repeated at the end.
fn find_cycle(deps: &[Vec<usize>]) -> Option<Vec<usize>> {
    fn visit(
        node: usize,
        deps: &[Vec<usize>],
        marks: &mut [Mark],
        stack: &mut Vec<usize>,
    ) -> Option<Vec<usize>> {
        marks[node] = Mark::OnStack;
        stack.push(node);
        for &dep in &deps[node] {
            match marks[dep] {
                Mark::OnStack => {
                    let start = stack.iter().position(|&n| n == dep)?;
                    let mut cycle = stack[start..].to_vec();
                    cycle.push(dep);
                    return Some(cycle);
                }
                Mark::Unvisited => {
                    if let Some(cycle) = visit(dep, deps, marks, stack) {
                        return Some(cycle);
                    }
                }
                Mark::Done => {}
            }
        }
        stack.pop();
        marks[node] = Mark::Done;
        None
    }

    let mut marks = vec![Mark::Unvisited; deps.len()];
    let mut stack = Vec::new();
    for node in 0..deps.len() {
        if marks[node] == Mark::Unvisited {
            if let Some(cycle) = visit(node, deps, &mut marks, &mut stack) {
                return Some(cycle);
            }
        }
    }
    None
}

//! The judgment task graph: 4 Stage 1, 13 Stage 2, 4 Stage 3 and one audit
//! task, wired through the state slots they read and write.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::engine::{TaskGraph, TaskSpec};
use crate::error::{JudgeError, PipelineError};
use crate::judge::{AuditContext, JudgmentRequest, PromptContext};
use crate::model::{Category, SubCategory};
use crate::state::{EvaluationState, Slot, SlotUpdate};
use crate::traits::Judge;

/// Name of the audit task.
pub const AUDIT_TASK: &str = "missing_errors_audit";

/// Name of the task that produces a slot.
#[must_use]
pub fn task_name(slot: Slot) -> String {
    match slot {
        Slot::StageOne(category) => format!("{category}_stage1"),
        Slot::StageTwo(sub) => sub.as_str().to_string(),
        Slot::StageThree(category) => format!("{category}_stage3"),
        Slot::Audit => AUDIT_TASK.to_string(),
    }
}

fn required<T>(value: Option<T>, slot: Slot) -> Result<T, JudgeError> {
    value.ok_or_else(|| JudgeError::MissingField {
        field: slot.to_string(),
    })
}

fn stage_one_task<J>(judge: Arc<J>, category: Category) -> TaskSpec<EvaluationState>
where
    J: Judge + ?Sized + 'static,
{
    let slot = Slot::StageOne(category);
    TaskSpec::new(task_name(slot), Vec::new(), vec![slot], move |view: EvaluationState| {
        let judge = Arc::clone(&judge);
        async move {
            let request = JudgmentRequest::StageOne {
                context: PromptContext::from(&view),
                category,
            };
            let result = judge.judge(request).await?.into_stage_one()?;
            Ok(vec![SlotUpdate::StageOne(category, result)])
        }
    })
}

fn stage_two_task<J>(judge: Arc<J>, sub: SubCategory) -> TaskSpec<EvaluationState>
where
    J: Judge + ?Sized + 'static,
{
    let read = Slot::StageOne(sub.category());
    let slot = Slot::StageTwo(sub);
    TaskSpec::new(task_name(slot), vec![read], vec![slot], move |view: EvaluationState| {
        let judge = Arc::clone(&judge);
        async move {
            let stage_one = required(view.stage_one(sub.category()), read)?.clone();
            let request = JudgmentRequest::StageTwo {
                context: PromptContext::from(&view),
                sub_category: sub,
                stage_one,
            };
            let result = judge.judge(request).await?.into_stage_two()?;
            Ok(vec![SlotUpdate::StageTwo(sub, result)])
        }
    })
}

fn stage_three_task<J>(judge: Arc<J>, category: Category) -> TaskSpec<EvaluationState>
where
    J: Judge + ?Sized + 'static,
{
    let reads: Vec<Slot> = std::iter::once(Slot::StageOne(category))
        .chain(category.sub_categories().iter().map(|s| Slot::StageTwo(*s)))
        .collect();
    let slot = Slot::StageThree(category);
    TaskSpec::new(task_name(slot), reads, vec![slot], move |view: EvaluationState| {
        let judge = Arc::clone(&judge);
        async move {
            let stage_one =
                required(view.stage_one(category), Slot::StageOne(category))?.clone();
            let mut stage_two = BTreeMap::new();
            for sub in category.sub_categories() {
                let result = required(view.stage_two(*sub), Slot::StageTwo(*sub))?;
                stage_two.insert(*sub, result.clone());
            }
            let request = JudgmentRequest::StageThree {
                context: PromptContext::from(&view),
                category,
                stage_one,
                stage_two,
            };
            let result = judge.judge(request).await?.into_stage_three()?;
            Ok(vec![SlotUpdate::StageThree(category, result)])
        }
    })
}

fn audit_task<J>(judge: Arc<J>) -> TaskSpec<EvaluationState>
where
    J: Judge + ?Sized + 'static,
{
    let reads: Vec<Slot> = Slot::all()
        .into_iter()
        .filter(|s| *s != Slot::Audit)
        .collect();
    TaskSpec::new(AUDIT_TASK, reads, vec![Slot::Audit], move |view: EvaluationState| {
        let judge = Arc::clone(&judge);
        async move {
            let request = JudgmentRequest::Audit {
                context: PromptContext::from(&view),
                prior: AuditContext::from(&view),
            };
            let result = judge.judge(request).await?.into_audit()?;
            Ok(vec![SlotUpdate::Audit(result)])
        }
    })
}

/// Build the evaluation graph over a judge.
///
/// Tasks are declared stage by stage, categories and sub-categories in
/// their canonical order, which is also the order ready tasks start in.
///
/// # Errors
///
/// Returns a construction error only if the declarations are inconsistent.
pub fn build_graph<J>(judge: Arc<J>) -> Result<TaskGraph<EvaluationState>, PipelineError>
where
    J: Judge + ?Sized + 'static,
{
    let mut tasks = Vec::with_capacity(Slot::all().len());
    tasks.extend(
        Category::ALL
            .into_iter()
            .map(|c| stage_one_task(Arc::clone(&judge), c)),
    );
    tasks.extend(
        SubCategory::ALL
            .into_iter()
            .map(|s| stage_two_task(Arc::clone(&judge), s)),
    );
    tasks.extend(
        Category::ALL
            .into_iter()
            .map(|c| stage_three_task(Arc::clone(&judge), c)),
    );
    tasks.push(audit_task(judge));
    TaskGraph::new(tasks)
}

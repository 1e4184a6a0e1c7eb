//! Shared evaluation state.
//!
//! The state is the blackboard every judgment task reads from and the
//! executor writes into. It holds the immutable pass context (input texts,
//! round bounds, the audit carried over from the previous round) and one
//! typed slot per task output:
//!
//! | Slot | Count | Writer |
//! |------|-------|--------|
//! | [`Slot::StageOne`] | 4 | category Stage 1 tasks |
//! | [`Slot::StageTwo`] | 13 | sub-category Stage 2 tasks |
//! | [`Slot::StageThree`] | 4 | category Stage 3 tasks |
//! | [`Slot::Audit`] | 1 | the audit task |
//!
//! The aggregation field is derived after the final round and never written
//! by a task.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use crate::engine::Blackboard;
use crate::model::{
    AggregationOutput, AuditResult, Category, EvaluationInput, StageOneResult, StageThreeResult,
    StageTwoResult, SubCategory,
};

/// Name of a single output slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slot {
    /// Stage 1 result for a category.
    StageOne(Category),
    /// Stage 2 result for a sub-category.
    StageTwo(SubCategory),
    /// Stage 3 verification for a category.
    StageThree(Category),
    /// Missing-error audit.
    Audit,
}

impl Slot {
    /// Every slot in declaration order.
    #[must_use]
    pub fn all() -> Vec<Self> {
        Category::ALL
            .into_iter()
            .map(Self::StageOne)
            .chain(SubCategory::ALL.into_iter().map(Self::StageTwo))
            .chain(Category::ALL.into_iter().map(Self::StageThree))
            .chain(std::iter::once(Self::Audit))
            .collect()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StageOne(category) => write!(f, "{category}Stage1"),
            Self::StageTwo(sub) => f.write_str(sub.as_str()),
            Self::StageThree(category) => write!(f, "{category}Stage3"),
            Self::Audit => f.write_str("missingErrors"),
        }
    }
}

/// A task result addressed to one slot.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotUpdate {
    /// Write a Stage 1 slot.
    StageOne(Category, StageOneResult),
    /// Write a Stage 2 slot.
    StageTwo(SubCategory, StageTwoResult),
    /// Write a Stage 3 slot.
    StageThree(Category, StageThreeResult),
    /// Write the audit slot.
    Audit(AuditResult),
}

/// State of one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationState {
    run_id: Uuid,
    input: EvaluationInput,
    round: u32,
    max_rounds: u32,
    missing_errors: Option<AuditResult>,
    stage_one: BTreeMap<Category, StageOneResult>,
    stage_two: BTreeMap<SubCategory, StageTwoResult>,
    stage_three: BTreeMap<Category, StageThreeResult>,
    audit: Option<AuditResult>,
    aggregation: Option<AggregationOutput>,
}

impl EvaluationState {
    /// Create a fresh state for an input, with normalized round bounds.
    #[must_use]
    pub fn new(input: EvaluationInput) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            round: input.start_round(),
            max_rounds: input.round_limit(),
            input,
            missing_errors: None,
            stage_one: BTreeMap::new(),
            stage_two: BTreeMap::new(),
            stage_three: BTreeMap::new(),
            audit: None,
            aggregation: None,
        }
    }

    /// Identifier used to correlate log lines of one run.
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// The texts under evaluation.
    #[must_use]
    pub const fn input(&self) -> &EvaluationInput {
        &self.input
    }

    /// Current round.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// Round limit.
    #[must_use]
    pub const fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    /// Audit result carried over from the previous round.
    #[must_use]
    pub const fn missing_errors(&self) -> Option<&AuditResult> {
        self.missing_errors.as_ref()
    }

    /// Stage 1 result for a category.
    #[must_use]
    pub fn stage_one(&self, category: Category) -> Option<&StageOneResult> {
        self.stage_one.get(&category)
    }

    /// Stage 2 result for a sub-category.
    #[must_use]
    pub fn stage_two(&self, sub: SubCategory) -> Option<&StageTwoResult> {
        self.stage_two.get(&sub)
    }

    /// Present Stage 2 results of a category, in sub-category order.
    #[must_use]
    pub fn stage_two_for(&self, category: Category) -> Vec<(SubCategory, &StageTwoResult)> {
        category
            .sub_categories()
            .iter()
            .filter_map(|sub| self.stage_two.get(sub).map(|r| (*sub, r)))
            .collect()
    }

    /// Stage 3 result for a category.
    #[must_use]
    pub fn stage_three(&self, category: Category) -> Option<&StageThreeResult> {
        self.stage_three.get(&category)
    }

    /// Audit result of the current round.
    #[must_use]
    pub const fn audit(&self) -> Option<&AuditResult> {
        self.audit.as_ref()
    }

    /// Final aggregation, once computed.
    #[must_use]
    pub const fn aggregation(&self) -> Option<&AggregationOutput> {
        self.aggregation.as_ref()
    }

    /// Whether a slot currently holds a value.
    #[must_use]
    pub fn is_filled(&self, slot: Slot) -> bool {
        match slot {
            Slot::StageOne(c) => self.stage_one.contains_key(&c),
            Slot::StageTwo(s) => self.stage_two.contains_key(&s),
            Slot::StageThree(c) => self.stage_three.contains_key(&c),
            Slot::Audit => self.audit.is_some(),
        }
    }

    /// Enter a new round: the current audit becomes the carried context.
    pub fn begin_round(&mut self, round: u32) {
        self.missing_errors = self.audit.take();
        self.round = round;
    }

    /// Store the final aggregation.
    pub fn set_aggregation(&mut self, aggregation: AggregationOutput) {
        self.aggregation = Some(aggregation);
    }
}

impl Blackboard for EvaluationState {
    type Slot = Slot;
    type Update = SlotUpdate;

    fn project(&self, reads: &[Slot]) -> Self {
        let mut view = Self {
            run_id: self.run_id,
            input: self.input.clone(),
            round: self.round,
            max_rounds: self.max_rounds,
            missing_errors: self.missing_errors.clone(),
            stage_one: BTreeMap::new(),
            stage_two: BTreeMap::new(),
            stage_three: BTreeMap::new(),
            audit: None,
            aggregation: None,
        };
        for slot in reads {
            match *slot {
                Slot::StageOne(c) => {
                    if let Some(r) = self.stage_one.get(&c) {
                        view.stage_one.insert(c, r.clone());
                    }
                }
                Slot::StageTwo(s) => {
                    if let Some(r) = self.stage_two.get(&s) {
                        view.stage_two.insert(s, r.clone());
                    }
                }
                Slot::StageThree(c) => {
                    if let Some(r) = self.stage_three.get(&c) {
                        view.stage_three.insert(c, r.clone());
                    }
                }
                Slot::Audit => view.audit.clone_from(&self.audit),
            }
        }
        view
    }

    fn slot_of(update: &SlotUpdate) -> Slot {
        match update {
            SlotUpdate::StageOne(c, _) => Slot::StageOne(*c),
            SlotUpdate::StageTwo(s, _) => Slot::StageTwo(*s),
            SlotUpdate::StageThree(c, _) => Slot::StageThree(*c),
            SlotUpdate::Audit(_) => Slot::Audit,
        }
    }

    fn merge(&mut self, update: SlotUpdate) {
        match update {
            SlotUpdate::StageOne(c, r) => {
                self.stage_one.insert(c, r);
            }
            SlotUpdate::StageTwo(s, r) => {
                self.stage_two.insert(s, r);
            }
            SlotUpdate::StageThree(c, r) => {
                self.stage_three.insert(c, r);
            }
            SlotUpdate::Audit(r) => self.audit = Some(r),
        }
    }

    fn clear(&mut self, slots: &[Slot]) {
        for slot in slots {
            match slot {
                Slot::StageOne(c) => {
                    self.stage_one.remove(c);
                }
                Slot::StageTwo(s) => {
                    self.stage_two.remove(s);
                }
                Slot::StageThree(c) => {
                    self.stage_three.remove(c);
                }
                Slot::Audit => self.audit = None,
            }
        }
    }
}

//! Domain types: the error taxonomy, judgment results and the evaluation input.

mod category;
mod input;
mod results;

pub use category::{Category, SubCategory};
pub use input::EvaluationInput;
pub use results::{
    AggregationOutput, AuditResult, StageOneResult, StageThreeResult, StageTwoResult, Verdict,
};

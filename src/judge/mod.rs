//! The judgment-task collaborator: request/reply types, reply parsing and
//! the LLM-backed implementation.

mod llm_judge;
mod parsing;
mod request;

pub use llm_judge::{LlmJudge, DEFAULT_MAX_TOKENS};
pub use parsing::{
    extract_json, parse_audit, parse_judgment, parse_stage_one, parse_stage_three,
    parse_stage_two,
};
pub use request::{AuditContext, Judgment, JudgmentKind, JudgmentRequest, PromptContext};

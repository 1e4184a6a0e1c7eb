//! Integration tests for the evaluation pipeline.
//!
//! These drive [`mt_quality::pipeline::Evaluator`] end to end against a
//! deterministic in-process judge.

mod common;
mod evaluation_workflow;
mod loop_control;
mod order_invariance;

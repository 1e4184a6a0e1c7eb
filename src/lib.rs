//! Machine-translation quality scoring.
//!
//! Scores a translation against its source and a reference by running a
//! layered graph of LLM judgment tasks:
//!
//! - **Stage 1**: one coarse judgment per error category (accuracy,
//!   fluency, terminology, style)
//! - **Stage 2**: one critical re-evaluation per sub-category, each reading
//!   its category's Stage 1 result
//! - **Stage 3**: one verification per category over all of its Stage 1
//!   and Stage 2 results
//! - **Audit**: a check for errors every earlier task missed
//!
//! When the audit finds missed errors the graph runs again with the audit
//! as context, up to a round limit. The final state is aggregated into
//! per-category error probabilities and a 0-100 quality score.
//!
//! # Quick Start
//!
//! ```bash
//! OPENAI_API_KEY=sk-xxx ./mt-quality input.json
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐   ┌────────────────┐   ┌──────────────┐
//! │ pipeline │──▶│ engine (graph) │──▶│ judge (LLM)  │──▶ chat-completions API
//! └────┬─────┘   └───────┬────────┘   └──────────────┘
//!      │                 ▼
//!      │           state (slots)
//!      ▼
//!   scoring
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod engine;
pub mod error;
pub mod judge;
pub mod llm;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod prompts;
pub mod scoring;
pub mod state;
pub mod traits;

#[cfg(test)]
mod test_utils;

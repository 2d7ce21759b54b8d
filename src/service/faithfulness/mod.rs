//! Two-tier faithfulness verification for coverage decisions
//!
//! Tier one is a deterministic lexical check that runs offline; tier two
//! is an LLM judge. The tiers can disagree on semantically subtle cases,
//! and the evaluation report shows both verdicts side by side.

pub mod deterministic;
pub mod judge;
pub mod prompts;

pub use deterministic::deterministic_faithfulness_check;
pub use judge::{FaithfulnessJudge, JudgeService};

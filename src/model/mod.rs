pub mod clause;
pub mod config;
pub mod decision;
pub mod verdict;

pub use clause::{PolicyClause, RetrievedClause};
pub use config::Config;
pub use decision::{ConfidenceLevel, CoverageDecision, CoverageLabel};
pub use verdict::{
    DeterministicVerdict, EvaluationRecord, EvaluationSummary, JudgeOutcome, JudgeVerdict,
};

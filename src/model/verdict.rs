//! Verdict taxonomy for the two faithfulness tiers, plus the per-claim
//! report row and the batch summary.
//!
//! The deterministic and judge verdict sets are deliberately kept as two
//! separate enums: the deterministic tier can flag fabricated evidence,
//! the judge tier cannot, and disagreement between the tiers is itself a
//! signal the report is meant to expose.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Outcome of the deterministic lexical check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeterministicVerdict {
    Supported,
    PartiallySupported,
    Unsupported,
    FabricatedEvidence,
}

impl fmt::Display for DeterministicVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Supported => "SUPPORTED",
            Self::PartiallySupported => "PARTIALLY_SUPPORTED",
            Self::Unsupported => "UNSUPPORTED",
            Self::FabricatedEvidence => "FABRICATED_EVIDENCE",
        };
        f.write_str(text)
    }
}

/// Outcome of the LLM-judge check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JudgeVerdict {
    Supported,
    PartiallySupported,
    NotSupported,
}

impl fmt::Display for JudgeVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Supported => "SUPPORTED",
            Self::PartiallySupported => "PARTIALLY_SUPPORTED",
            Self::NotSupported => "NOT_SUPPORTED",
        };
        f.write_str(text)
    }
}

/// Judge result as observed by the orchestrator.
///
/// A failed judge call is kept distinct from a genuine verdict instead of
/// being silently collapsed into one; the report shows the fail-closed
/// status and carries the failure reason in its own column.
#[derive(Debug, Clone, PartialEq)]
pub enum JudgeOutcome {
    Verdict(JudgeVerdict),
    CallFailed(String),
}

impl JudgeOutcome {
    /// Status written to the report. Failures collapse to `NOT_SUPPORTED`.
    pub fn status(&self) -> JudgeVerdict {
        match self {
            Self::Verdict(verdict) => *verdict,
            Self::CallFailed(_) => JudgeVerdict::NotSupported,
        }
    }

    /// Failure reason, if the judge call never produced a verdict
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::Verdict(_) => None,
            Self::CallFailed(reason) => Some(reason),
        }
    }
}

// One row of the faithfulness report, built once per claim after both
// checks complete and never mutated afterwards. Field order is the CSV
// column order. `judge_diagnostic` is empty unless the judge call failed
// or generation never produced a decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub claim_id: String,
    pub insurer: Option<String>,
    pub coverage_decision: String,
    pub confidence: String,
    pub deterministic_status: DeterministicVerdict,
    pub judge_status: JudgeVerdict,
    pub judge_diagnostic: String,
    pub retrieved_sources: String,
    pub retrieved_snippet: String,
}

/// Per-tier verdict counts for one evaluation run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationSummary {
    pub total: usize,
    pub det_supported: usize,
    pub det_partially_supported: usize,
    pub det_unsupported: usize,
    pub det_fabricated_evidence: usize,
    pub judge_supported: usize,
    pub judge_partially_supported: usize,
    pub judge_not_supported: usize,
    /// Judge rows whose status is fail-closed rather than a real verdict
    pub judge_failures: usize,
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * count as f64 / total as f64
    }
}

impl fmt::Display for EvaluationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===== FAITHFULNESS SUMMARY =====")?;
        writeln!(f, "Total Claims: {}", self.total)?;
        writeln!(f)?;
        writeln!(f, "Deterministic Results:")?;
        writeln!(
            f,
            "SUPPORTED: {} ({:.2}%)",
            self.det_supported,
            percent(self.det_supported, self.total)
        )?;
        writeln!(
            f,
            "PARTIALLY_SUPPORTED: {} ({:.2}%)",
            self.det_partially_supported,
            percent(self.det_partially_supported, self.total)
        )?;
        writeln!(
            f,
            "UNSUPPORTED: {} ({:.2}%)",
            self.det_unsupported,
            percent(self.det_unsupported, self.total)
        )?;
        writeln!(
            f,
            "FABRICATED_EVIDENCE: {} ({:.2}%)",
            self.det_fabricated_evidence,
            percent(self.det_fabricated_evidence, self.total)
        )?;
        writeln!(f)?;
        writeln!(f, "LLM Judge Results:")?;
        writeln!(
            f,
            "SUPPORTED: {} ({:.2}%)",
            self.judge_supported,
            percent(self.judge_supported, self.total)
        )?;
        writeln!(
            f,
            "PARTIALLY_SUPPORTED: {} ({:.2}%)",
            self.judge_partially_supported,
            percent(self.judge_partially_supported, self.total)
        )?;
        writeln!(
            f,
            "NOT_SUPPORTED: {} ({:.2}%)",
            self.judge_not_supported,
            percent(self.judge_not_supported, self.total)
        )?;
        write!(f, "Judge call failures: {}", self.judge_failures)
    }
}

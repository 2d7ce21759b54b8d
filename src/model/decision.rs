use std::fmt;

use serde::{Deserialize, Serialize};

/// Coverage label carried by a generated decision.
///
/// The model is asked for one of the four canonical labels; anything else
/// it replies with is preserved in `Other` so the faithfulness checkers can
/// still classify it. `Error` is recorded locally when generation fails and
/// is never requested from the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CoverageLabel {
    Covered,
    CoveredWithConditions,
    NotCovered,
    InsufficientEvidence,
    Error,
    Other(String),
}

impl From<String> for CoverageLabel {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "covered" => Self::Covered,
            "covered with conditions" => Self::CoveredWithConditions,
            "not covered" => Self::NotCovered,
            "insufficient evidence" => Self::InsufficientEvidence,
            "error" => Self::Error,
            _ => Self::Other(value),
        }
    }
}

impl From<CoverageLabel> for String {
    fn from(label: CoverageLabel) -> Self {
        label.to_string()
    }
}

impl fmt::Display for CoverageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Covered => "Covered",
            Self::CoveredWithConditions => "Covered with conditions",
            Self::NotCovered => "Not covered",
            Self::InsufficientEvidence => "Insufficient evidence",
            Self::Error => "ERROR",
            Self::Other(other) => other,
        };
        f.write_str(text)
    }
}

/// Confidence the model attaches to its own decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    #[serde(alias = "high", alias = "HIGH")]
    High,
    #[serde(alias = "medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "low", alias = "LOW")]
    Low,
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        };
        f.write_str(text)
    }
}

// The structured adjudication output parsed from the model's JSON reply.
// - coverage_decision: the label under test
// - conditions_or_exclusions: conditions the model says apply
// - evidence_sources: policy file names the model claims it relied on
// - confidence: self-reported confidence, absent when the model omits it
// Optional fields tolerate replies that drop them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageDecision {
    pub coverage_decision: CoverageLabel,
    #[serde(default)]
    pub conditions_or_exclusions: Vec<String>,
    #[serde(default)]
    pub evidence_sources: Vec<String>,
    #[serde(default)]
    pub confidence: Option<ConfidenceLevel>,
}

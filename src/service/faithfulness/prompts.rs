//! Prompts for faithfulness judging

use crate::model::{CoverageDecision, RetrievedClause};
use crate::service::decision::prompts::format_clause_block;

/// System prompt for the faithfulness judge
pub const JUDGE_SYSTEM_PROMPT: &str = r#"You are evaluating a Retrieval-Augmented Generation (RAG) system.

Your task:
Determine whether the model's decision is logically supported by the retrieved clauses.

Do NOT use external knowledge.
Only use the clauses provided."#;

/// Build the judge prompt for one adjudicated claim
pub fn build_judge_prompt(
    claim_text: &str,
    clauses: &[RetrievedClause],
    decision: &CoverageDecision,
) -> String {
    let clause_block = format_clause_block(clauses);
    let confidence = decision
        .confidence
        .as_ref()
        .map(|level| level.to_string())
        .unwrap_or_default();

    format!(
        r#"Claim:
{claim_text}

Model Decision:
Coverage Decision: {decision_label}
Confidence: {confidence}

Retrieved Clauses:
{clause_block}

Evaluate whether the decision is:

- SUPPORTED (fully grounded in clauses)
- PARTIALLY_SUPPORTED (some support but incomplete or ambiguous)
- NOT_SUPPORTED (decision contradicts or not grounded in clauses)

Respond in JSON format ONLY:

{{
  "judge_verdict": "SUPPORTED | PARTIALLY_SUPPORTED | NOT_SUPPORTED"
}}"#,
        decision_label = decision.coverage_decision,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConfidenceLevel, CoverageLabel, PolicyClause};

    fn sample_decision() -> CoverageDecision {
        CoverageDecision {
            coverage_decision: CoverageLabel::CoveredWithConditions,
            conditions_or_exclusions: vec!["24 month waiting period".to_string()],
            evidence_sources: vec!["policy_a.txt".to_string()],
            confidence: Some(ConfidenceLevel::High),
        }
    }

    fn sample_clauses() -> Vec<RetrievedClause> {
        vec![RetrievedClause {
            clause: PolicyClause {
                source_file: "policy_a.txt".to_string(),
                chunk_id: 3,
                text: "Cataract surgery is covered after 24 months.".to_string(),
            },
            distance: 0.2,
        }]
    }

    #[test]
    fn test_judge_prompt_shows_decision_and_clauses() {
        let prompt = build_judge_prompt("Is cataract surgery covered?", &sample_clauses(), &sample_decision());

        assert!(prompt.contains("Claim:\nIs cataract surgery covered?"));
        assert!(prompt.contains("Coverage Decision: Covered with conditions"));
        assert!(prompt.contains("Confidence: High"));
        assert!(prompt.contains("Clause 1 (Source: policy_a.txt):"));
        assert!(prompt.contains("\"judge_verdict\": \"SUPPORTED | PARTIALLY_SUPPORTED | NOT_SUPPORTED\""));
    }

    #[test]
    fn test_judge_prompt_leaves_confidence_blank_when_absent() {
        let mut decision = sample_decision();
        decision.confidence = None;

        let prompt = build_judge_prompt("claim", &sample_clauses(), &decision);
        assert!(prompt.contains("Confidence: \n"));
    }

    #[test]
    fn test_judge_system_prompt_forbids_external_knowledge() {
        assert!(JUDGE_SYSTEM_PROMPT.contains("Do NOT use external knowledge."));
        assert!(JUDGE_SYSTEM_PROMPT.contains("Only use the clauses provided."));
    }
}

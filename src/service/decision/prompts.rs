//! Prompts for coverage decision generation

use crate::model::RetrievedClause;

/// System prompt for coverage adjudication
pub const DECISION_SYSTEM_PROMPT: &str = r#"You are a healthcare insurance policy expert.

Answer the claim question strictly using ONLY the policy clauses provided.
If coverage is subject to waiting periods, sub-limits, exclusions, or policy conditions,
respond as "Covered with conditions" and explicitly list them.

Only respond as "Covered" if the policy clauses clearly indicate unconditional coverage.

If the claim mentions a specific insurer or scheme, prioritize clauses from that insurer or scheme.
If evidence comes from mixed insurers, lower confidence or state "Insufficient evidence"."#;

/// Render retrieved clauses as a numbered context block, closest first.
///
/// The judge prompt reuses this renderer so both models see the evidence
/// in exactly the same shape.
pub fn format_clause_block(clauses: &[RetrievedClause]) -> String {
    let mut block = String::new();
    for (i, retrieved) in clauses.iter().enumerate() {
        block.push_str(&format!(
            "\nClause {} (Source: {}):\n{}\n",
            i + 1,
            retrieved.clause.source_file,
            retrieved.clause.text
        ));
    }
    block
}

/// Build the adjudication prompt for one claim
pub fn build_decision_prompt(claim_text: &str, clauses: &[RetrievedClause]) -> String {
    let context = format_clause_block(clauses);
    format!(
        r#"Claim question:
{claim_text}

Policy clauses:
{context}

Respond in the following JSON format ONLY:

{{
  "coverage_decision": "Covered | Covered with conditions | Not covered | Insufficient evidence",
  "conditions_or_exclusions": [
    "condition or exclusion 1",
    "condition or exclusion 2"
  ],
  "evidence_sources": [
    "policy file name(s)"
  ],
  "confidence": "High | Medium | Low"
}}"#
    )
}

//! Batch faithfulness evaluation over synthetic claims
//!
//! Runs adjudication, the deterministic check and the LLM judge for every
//! claim in turn, producing exactly one report row per claim no matter
//! which stage failed.

pub mod report;

use crate::claims::ClaimDocument;
use crate::model::{
    CoverageDecision, CoverageLabel, DeterministicVerdict, EvaluationRecord, EvaluationSummary,
    JudgeOutcome, JudgeVerdict, RetrievedClause,
};
use crate::service::decision::DecisionGenerate;
use crate::service::faithfulness::{FaithfulnessJudge, deterministic_faithfulness_check};

/// Characters of clause text kept in a report row
const SNIPPET_MAX_CHARS: usize = 300;

/// Orchestrates the per-claim pipeline: decision, lexical check, judge
pub struct EvaluationService {
    generator: Box<dyn DecisionGenerate>,
    judge: Box<dyn FaithfulnessJudge>,
}

impl EvaluationService {
    pub fn new(generator: Box<dyn DecisionGenerate>, judge: Box<dyn FaithfulnessJudge>) -> Self {
        Self { generator, judge }
    }

    /// Evaluate a batch of claims sequentially.
    ///
    /// Every claim yields a record; a failure at any stage becomes a
    /// fail-closed row rather than aborting the batch.
    pub async fn run(&self, claims: &[ClaimDocument]) -> Vec<EvaluationRecord> {
        tracing::info!(claims = claims.len(), "Running faithfulness evaluation");

        let mut records = Vec::with_capacity(claims.len());
        for claim in claims {
            let record = self.evaluate_claim(claim).await;
            tracing::info!(
                claim_id = %record.claim_id,
                deterministic = %record.deterministic_status,
                judge = %record.judge_status,
                "Claim evaluated"
            );
            records.push(record);
        }
        records
    }

    async fn evaluate_claim(&self, claim: &ClaimDocument) -> EvaluationRecord {
        let generated = match self.generator.generate(&claim.text).await {
            Ok(generated) => generated,
            Err(e) => {
                tracing::error!(
                    claim_id = %claim.claim_id,
                    error = %e,
                    "Decision generation failed"
                );
                return error_record(claim, &e.to_string());
            }
        };

        match &generated.decision {
            Some(decision) => {
                let deterministic =
                    deterministic_faithfulness_check(Some(decision), &generated.clauses);
                let outcome = self
                    .judge
                    .judge(&claim.text, &generated.clauses, decision)
                    .await;
                build_record(claim, Some(decision), deterministic, &outcome, &generated.clauses)
            }
            None => {
                // The completion was not parseable JSON: both tiers fail
                // closed and the judge is never asked to rate garbage
                let outcome =
                    JudgeOutcome::CallFailed("decision output was not valid JSON".to_string());
                build_record(
                    claim,
                    None,
                    DeterministicVerdict::Unsupported,
                    &outcome,
                    &generated.clauses,
                )
            }
        }
    }
}

fn clause_sources(clauses: &[RetrievedClause]) -> String {
    clauses
        .iter()
        .map(|retrieved| retrieved.clause.source_file.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn clause_snippet(clauses: &[RetrievedClause]) -> String {
    clauses
        .iter()
        .map(|retrieved| retrieved.clause.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(SNIPPET_MAX_CHARS)
        .collect()
}

/// Assemble a report row from this claim's own pipeline outputs
fn build_record(
    claim: &ClaimDocument,
    decision: Option<&CoverageDecision>,
    deterministic_status: DeterministicVerdict,
    judge_outcome: &JudgeOutcome,
    clauses: &[RetrievedClause],
) -> EvaluationRecord {
    let (coverage_decision, confidence) = match decision {
        Some(decision) => (
            decision.coverage_decision.to_string(),
            decision
                .confidence
                .as_ref()
                .map(|level| level.to_string())
                .unwrap_or_default(),
        ),
        None => (String::new(), String::new()),
    };

    EvaluationRecord {
        claim_id: claim.claim_id.clone(),
        insurer: claim.insurer.clone(),
        coverage_decision,
        confidence,
        deterministic_status,
        judge_status: judge_outcome.status(),
        judge_diagnostic: judge_outcome.diagnostic().unwrap_or_default().to_string(),
        retrieved_sources: clause_sources(clauses),
        retrieved_snippet: clause_snippet(clauses),
    }
}

/// Row for a claim whose decision generation failed outright. No clauses
/// are available, so the retrieval columns stay empty.
fn error_record(claim: &ClaimDocument, diagnostic: &str) -> EvaluationRecord {
    EvaluationRecord {
        claim_id: claim.claim_id.clone(),
        insurer: claim.insurer.clone(),
        coverage_decision: CoverageLabel::Error.to_string(),
        confidence: String::new(),
        deterministic_status: DeterministicVerdict::Unsupported,
        judge_status: JudgeVerdict::NotSupported,
        judge_diagnostic: diagnostic.to_string(),
        retrieved_sources: String::new(),
        retrieved_snippet: String::new(),
    }
}

/// Tally per-tier verdict counts for a finished run
pub fn summarize(records: &[EvaluationRecord]) -> EvaluationSummary {
    let mut summary = EvaluationSummary {
        total: records.len(),
        ..Default::default()
    };

    for record in records {
        match record.deterministic_status {
            DeterministicVerdict::Supported => summary.det_supported += 1,
            DeterministicVerdict::PartiallySupported => summary.det_partially_supported += 1,
            DeterministicVerdict::Unsupported => summary.det_unsupported += 1,
            DeterministicVerdict::FabricatedEvidence => summary.det_fabricated_evidence += 1,
        }
        match record.judge_status {
            JudgeVerdict::Supported => summary.judge_supported += 1,
            JudgeVerdict::PartiallySupported => summary.judge_partially_supported += 1,
            JudgeVerdict::NotSupported => summary.judge_not_supported += 1,
        }
        if !record.judge_diagnostic.is_empty() {
            summary.judge_failures += 1;
        }
    }

    summary
}

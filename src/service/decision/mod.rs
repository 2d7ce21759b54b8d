//! Coverage decision generation using LLM
//!
//! Retrieves the policy clauses nearest a claim and asks the model for a
//! structured coverage decision grounded on them.

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::openai;

use crate::model::{CoverageDecision, RetrievedClause};
use crate::service::decision::prompts::{DECISION_SYSTEM_PROMPT, build_decision_prompt};
use crate::service::llm::LlmClient;
use crate::service::retrieval::ClauseRetriever;

pub mod error;
pub mod prompts;

pub use error::DecisionError;

/// Environment variable for the decision model (defaults to gpt-4o-mini if not set)
const ENV_DECISION_MODEL: &str = "DECISION_MODEL";

/// Default model for coverage decisions
const DEFAULT_MODEL: &str = openai::GPT_4O_MINI;

/// Sampling temperature for coverage decisions. Low but not zero: the
/// wording of conditions may vary, the JSON shape may not.
const DECISION_TEMPERATURE: f64 = 0.2;

/// One adjudication result, keeping the raw completion for diagnostics
#[derive(Debug, Clone)]
pub struct GeneratedDecision {
    /// Parsed decision, `None` when the completion was not valid JSON
    pub decision: Option<CoverageDecision>,
    /// Raw completion text as returned by the model
    pub raw_output: String,
    /// Clauses the decision was grounded on, closest first
    pub clauses: Vec<RetrievedClause>,
}

/// Claim adjudication seam, implemented by the RAG decision service
#[async_trait]
pub trait DecisionGenerate: Send + Sync {
    async fn generate(&self, claim_text: &str) -> Result<GeneratedDecision, DecisionError>;
}

/// Service producing coverage decisions over the policy corpus
pub struct DecisionService {
    llm_client: LlmClient,
    retriever: ClauseRetriever<openai::EmbeddingModel>,
    model: String,
    top_k: usize,
}

impl DecisionService {
    /// Create a new decision service
    /// Uses a shared LLM client passed from startup.
    /// Optionally uses DECISION_MODEL env var (defaults to gpt-4o-mini).
    pub fn new(
        llm_client: LlmClient,
        retriever: ClauseRetriever<openai::EmbeddingModel>,
        top_k: usize,
    ) -> Self {
        let model =
            std::env::var(ENV_DECISION_MODEL).unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        tracing::info!(
            model = %model,
            top_k,
            "Decision service initialized"
        );
        Self {
            llm_client,
            retriever,
            model,
            top_k,
        }
    }
}

/// Parse a completion into a decision; anything that is not the expected
/// JSON shape counts as unparseable rather than an error
fn parse_decision(raw_output: &str) -> Option<CoverageDecision> {
    serde_json::from_str(raw_output).ok()
}

#[async_trait]
impl DecisionGenerate for DecisionService {
    async fn generate(&self, claim_text: &str) -> Result<GeneratedDecision, DecisionError> {
        let clauses = self.retriever.retrieve(claim_text, self.top_k).await?;

        let prompt = build_decision_prompt(claim_text, &clauses);
        let prompt_length = prompt.len();

        tracing::debug!(
            model = %self.model,
            clauses = clauses.len(),
            prompt_length = prompt_length,
            "Initiating OpenAI API call for coverage decision"
        );

        let start_time = std::time::Instant::now();

        let agent = self
            .llm_client
            .openai_client()
            .agent(&self.model)
            .preamble(DECISION_SYSTEM_PROMPT)
            .temperature(DECISION_TEMPERATURE)
            .additional_params(serde_json::json!({
                "response_format": { "type": "json_object" }
            }))
            .build();

        let raw_output = match agent.prompt(prompt).await {
            Ok(result) => {
                let elapsed = start_time.elapsed();
                tracing::info!(
                    model = %self.model,
                    elapsed_ms = elapsed.as_millis(),
                    prompt_length = prompt_length,
                    "OpenAI API call for coverage decision completed successfully"
                );
                result
            }
            Err(e) => {
                let elapsed = start_time.elapsed();
                tracing::error!(
                    model = %self.model,
                    elapsed_ms = elapsed.as_millis(),
                    prompt_length = prompt_length,
                    error = %e,
                    "OpenAI API call for coverage decision failed"
                );
                return Err(DecisionError::CompletionFailed(e.to_string()));
            }
        };

        let decision = parse_decision(&raw_output);
        if decision.is_none() {
            let preview: String = raw_output.chars().take(200).collect();
            tracing::warn!(
                model = %self.model,
                raw_preview = %preview,
                "Decision output was not valid JSON"
            );
        }

        Ok(GeneratedDecision {
            decision,
            raw_output,
            clauses,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConfidenceLevel, CoverageLabel};

    #[test]
    fn test_parse_decision_accepts_canonical_output() {
        let raw = r#"{
            "coverage_decision": "Covered with conditions",
            "conditions_or_exclusions": ["24 month waiting period"],
            "evidence_sources": ["policy_a.txt"],
            "confidence": "Medium"
        }"#;

        let decision = parse_decision(raw).unwrap();
        assert_eq!(
            decision.coverage_decision,
            CoverageLabel::CoveredWithConditions
        );
        assert_eq!(
            decision.conditions_or_exclusions,
            vec!["24 month waiting period".to_string()]
        );
        assert_eq!(decision.confidence, Some(ConfidenceLevel::Medium));
    }

    #[test]
    fn test_parse_decision_defaults_optional_fields() {
        let raw = r#"{"coverage_decision": "Not covered"}"#;

        let decision = parse_decision(raw).unwrap();
        assert_eq!(decision.coverage_decision, CoverageLabel::NotCovered);
        assert!(decision.conditions_or_exclusions.is_empty());
        assert!(decision.evidence_sources.is_empty());
        assert_eq!(decision.confidence, None);
    }

    #[test]
    fn test_parse_decision_preserves_unknown_labels() {
        let raw = r#"{"coverage_decision": "Pending review"}"#;

        let decision = parse_decision(raw).unwrap();
        assert_eq!(
            decision.coverage_decision,
            CoverageLabel::Other("Pending review".to_string())
        );
    }

    #[test]
    fn test_parse_decision_rejects_non_json_output() {
        assert!(parse_decision("The claim is covered.").is_none());
        assert!(parse_decision("").is_none());
        assert!(parse_decision(r#"{"coverage_decision": 42}"#).is_none());
        assert!(parse_decision(r#"{"confidence": "High"}"#).is_none());
    }
}

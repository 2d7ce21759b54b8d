//! LLM judge for decision faithfulness
//!
//! Second verification tier: asks a model at temperature zero whether the
//! decision follows from the retrieved clauses alone. A judge call that
//! produces no verdict fails closed; the outcome records the reason.

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::providers::openai;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{CoverageDecision, JudgeOutcome, JudgeVerdict, RetrievedClause};
use crate::service::faithfulness::prompts::{JUDGE_SYSTEM_PROMPT, build_judge_prompt};
use crate::service::llm::LlmClient;

/// Environment variable for the judge model (defaults to gpt-4o-mini if not set)
const ENV_JUDGE_MODEL: &str = "JUDGE_MODEL";

/// Default model for faithfulness judging
const DEFAULT_MODEL: &str = openai::GPT_4O_MINI;

/// Wire shape of the judge reply
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct JudgeReply {
    judge_verdict: JudgeVerdict,
}

/// Faithfulness judging seam, implemented by the LLM judge service
#[async_trait]
pub trait FaithfulnessJudge: Send + Sync {
    async fn judge(
        &self,
        claim_text: &str,
        clauses: &[RetrievedClause],
        decision: &CoverageDecision,
    ) -> JudgeOutcome;
}

/// Service judging decision faithfulness with an LLM
pub struct JudgeService {
    llm_client: LlmClient,
    model: String,
}

impl JudgeService {
    /// Create a new judge service
    /// Uses a shared LLM client passed from startup.
    /// Optionally uses JUDGE_MODEL env var (defaults to gpt-4o-mini).
    pub fn new(llm_client: LlmClient) -> Self {
        let model = std::env::var(ENV_JUDGE_MODEL).unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        tracing::info!(
            model = %model,
            "Faithfulness judge initialized"
        );
        Self { llm_client, model }
    }
}

#[async_trait]
impl FaithfulnessJudge for JudgeService {
    async fn judge(
        &self,
        claim_text: &str,
        clauses: &[RetrievedClause],
        decision: &CoverageDecision,
    ) -> JudgeOutcome {
        let prompt = build_judge_prompt(claim_text, clauses, decision);
        let prompt_length = prompt.len();

        tracing::debug!(
            model = %self.model,
            clauses = clauses.len(),
            prompt_length = prompt_length,
            "Initiating OpenAI API call for faithfulness judgement"
        );

        let start_time = std::time::Instant::now();

        // Temperature 0.0 and a fixed seed for reproducible verdicts
        let extractor = self
            .llm_client
            .openai_client()
            .extractor::<JudgeReply>(&self.model)
            .preamble(JUDGE_SYSTEM_PROMPT)
            .additional_params(serde_json::json!({
                "temperature": 0.0,
                "seed": 42
            }))
            .build();

        match extractor.extract(&prompt).await {
            Ok(reply) => {
                let elapsed = start_time.elapsed();
                tracing::info!(
                    model = %self.model,
                    elapsed_ms = elapsed.as_millis(),
                    verdict = %reply.judge_verdict,
                    "OpenAI API call for faithfulness judgement completed successfully"
                );
                JudgeOutcome::Verdict(reply.judge_verdict)
            }
            Err(e) => {
                let elapsed = start_time.elapsed();
                tracing::error!(
                    model = %self.model,
                    elapsed_ms = elapsed.as_millis(),
                    prompt_length = prompt_length,
                    error = %e,
                    "OpenAI API call for faithfulness judgement failed"
                );
                JudgeOutcome::CallFailed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_judge_reply_parses_wire_verdicts() {
        let reply: JudgeReply =
            serde_json::from_str(r#"{"judge_verdict": "PARTIALLY_SUPPORTED"}"#).unwrap();
        assert_eq!(reply.judge_verdict, JudgeVerdict::PartiallySupported);

        // An out-of-vocabulary verdict must fail parsing, which the caller
        // turns into a fail-closed outcome
        assert!(serde_json::from_str::<JudgeReply>(r#"{"judge_verdict": "MAYBE"}"#).is_err());
    }
}

//! Application state and service initialization
//!
//! This module centralizes service construction and dependency injection
//! for the CLI commands that call the LLM provider.

use rig::providers::openai;

use crate::index::{self, IndexError};
use crate::model::Config;
use crate::service::retrieval::RetrievalError;
use crate::service::{
    ClauseRetriever, DecisionService, EvaluationService, JudgeService, LlmClient,
};

/// Environment variable holding the provider credential
const ENV_API_KEY: &str = "OPENAI_API_KEY";

/// Shared state for provider-backed commands.
///
/// Commands that never call the provider (chunking, synthetic claim
/// generation) work straight off `Config` and skip this, so a missing
/// credential only stops the commands that need one.
pub struct AppState {
    config: Config,
    llm_client: LlmClient,
}

impl AppState {
    /// Read the provider credential and build the shared LLM client
    pub fn new(config: Config) -> Result<Self, AppError> {
        let api_key =
            std::env::var(ENV_API_KEY).map_err(|_| AppError::MissingConfig(ENV_API_KEY))?;

        let llm_client = LlmClient::new(&api_key)
            .map_err(|_| AppError::InvalidConfig("Invalid OPENAI_API_KEY"))?;

        Ok(Self { config, llm_client })
    }

    pub fn llm_client(&self) -> &LlmClient {
        &self.llm_client
    }

    /// Load the persisted corpus and wrap it in a query-time retriever
    pub fn clause_retriever(&self) -> Result<ClauseRetriever<openai::EmbeddingModel>, AppError> {
        let index_dir = &self.config.paths.index_dir;
        let (index, clauses) = index::load_corpus(index_dir)?;
        tracing::info!(
            clauses = clauses.len(),
            dir = %index_dir.display(),
            "Loaded policy corpus"
        );

        Ok(ClauseRetriever::new(&self.llm_client, index, clauses)?)
    }

    /// Build the claim adjudication service over the loaded corpus
    pub fn decision_service(&self) -> Result<DecisionService, AppError> {
        let retriever = self.clause_retriever()?;
        Ok(DecisionService::new(
            self.llm_client.clone(),
            retriever,
            self.config.tuning.top_k,
        ))
    }

    /// Build the batch evaluation service: adjudication plus both
    /// faithfulness tiers
    pub fn evaluation_service(&self) -> Result<EvaluationService, AppError> {
        let decision_service = self.decision_service()?;
        let judge_service = JudgeService::new(self.llm_client.clone());

        Ok(EvaluationService::new(
            Box::new(decision_service),
            Box::new(judge_service),
        ))
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(&'static str),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// The persisted policy corpus could not be loaded
    #[error("Failed to load policy corpus: {0}")]
    Corpus(#[from] IndexError),

    /// Retriever construction failed
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),
}

//! Error types for decision generation

use thiserror::Error;

use crate::service::retrieval::RetrievalError;

/// Error type for decision generation
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecisionError {
    #[error("Clause retrieval failed: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("LLM completion failed: {0}")]
    CompletionFailed(String),
}

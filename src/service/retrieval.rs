//! Query-time clause retrieval over the policy vector index

use rig::embeddings::EmbeddingModel;
use rig::providers::openai;
use thiserror::Error;

use crate::index::{FlatIndex, IndexError};
use crate::model::{PolicyClause, RetrievedClause};
use crate::service::llm::LlmClient;

/// Error type for clause retrieval
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RetrievalError {
    #[error("Query text is empty")]
    EmptyQuery,

    #[error("Requested zero clauses")]
    ZeroK,

    #[error("Embedding request failed: {0}")]
    Embedding(String),

    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Embeds a query and finds its nearest policy clauses
pub struct ClauseRetriever<M> {
    embedding: M,
    index: FlatIndex,
    clauses: Vec<PolicyClause>,
}

impl ClauseRetriever<openai::EmbeddingModel> {
    pub fn new(
        llm_client: &LlmClient,
        index: FlatIndex,
        clauses: Vec<PolicyClause>,
    ) -> Result<Self, RetrievalError> {
        Self::with_model(llm_client.embedding_model(), index, clauses)
    }
}

impl<M: EmbeddingModel> ClauseRetriever<M> {
    pub fn with_model(
        embedding: M,
        index: FlatIndex,
        clauses: Vec<PolicyClause>,
    ) -> Result<Self, RetrievalError> {
        if index.len() != clauses.len() {
            return Err(IndexError::Misaligned {
                vectors: index.len(),
                clauses: clauses.len(),
            }
            .into());
        }

        Ok(Self {
            embedding,
            index,
            clauses,
        })
    }

    /// Return up to `k` clauses nearest to `query`, closest first.
    ///
    /// Fewer than `k` clauses come back when the corpus is smaller than `k`.
    pub async fn retrieve(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<RetrievedClause>, RetrievalError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RetrievalError::EmptyQuery);
        }
        if k == 0 {
            return Err(RetrievalError::ZeroK);
        }

        let embedding = self
            .embedding
            .embed_text(query)
            .await
            .map_err(|e| RetrievalError::Embedding(e.to_string()))?;
        let vector: Vec<f32> = embedding.vec.iter().map(|v| *v as f32).collect();

        let hits = self.index.search(&vector, k)?;

        // Hit indices are bounded by the alignment check in the constructor
        let retrieved = hits
            .into_iter()
            .map(|(idx, distance)| RetrievedClause {
                clause: self.clauses[idx].clone(),
                distance,
            })
            .collect();
        Ok(retrieved)
    }
}

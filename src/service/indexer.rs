//! Builds the policy vector index by embedding clause chunks in batches

use std::path::Path;

use rig::embeddings::EmbeddingModel;
use rig::providers::openai;
use thiserror::Error;

use crate::index::{self, FlatIndex, IndexError};
use crate::model::PolicyClause;
use crate::service::llm::{EMBEDDING_MODEL, LlmClient};

/// Clauses embedded per API call
const EMBED_BATCH_SIZE: usize = 100;

/// Error type for index builds
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IndexBuildError {
    #[error("No policy clauses to index")]
    EmptyCorpus,

    #[error("Embedding request failed: {0}")]
    Embedding(String),

    #[error("Embedding batch returned {found} vectors for {expected} clauses")]
    BatchMismatch { found: usize, expected: usize },

    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Embeds policy clauses and persists the resulting index
pub struct IndexBuilder<M> {
    embedding: M,
    model_name: String,
}

impl IndexBuilder<openai::EmbeddingModel> {
    pub fn new(llm_client: &LlmClient) -> Self {
        Self {
            embedding: llm_client.embedding_model(),
            model_name: EMBEDDING_MODEL.to_string(),
        }
    }
}

impl<M: EmbeddingModel> IndexBuilder<M> {
    pub fn with_model(embedding: M, model_name: impl Into<String>) -> Self {
        Self {
            embedding,
            model_name: model_name.into(),
        }
    }

    /// Embed every clause and write the index plus clause metadata into
    /// `index_dir`. Vector `i` always corresponds to clause `i`.
    pub async fn build(
        &self,
        clauses: &[PolicyClause],
        index_dir: &Path,
    ) -> Result<FlatIndex, IndexBuildError> {
        if clauses.is_empty() {
            return Err(IndexBuildError::EmptyCorpus);
        }

        let total_batches = clauses.len().div_ceil(EMBED_BATCH_SIZE);
        let mut indexed = FlatIndex::new(&self.model_name, self.embedding.ndims());

        for (batch_idx, batch) in clauses.chunks(EMBED_BATCH_SIZE).enumerate() {
            tracing::info!(
                batch = batch_idx + 1,
                total_batches,
                clauses = batch.len(),
                "Embedding clause batch"
            );

            let texts: Vec<String> = batch.iter().map(|clause| clause.text.clone()).collect();
            let embeddings = self
                .embedding
                .embed_texts(texts)
                .await
                .map_err(|e| IndexBuildError::Embedding(e.to_string()))?;

            if embeddings.len() != batch.len() {
                return Err(IndexBuildError::BatchMismatch {
                    found: embeddings.len(),
                    expected: batch.len(),
                });
            }

            for embedding in embeddings {
                let vector: Vec<f32> = embedding.vec.iter().map(|v| *v as f32).collect();
                indexed.add(vector)?;
            }
        }

        index::save_corpus(index_dir, &indexed, clauses)?;
        Ok(indexed)
    }
}

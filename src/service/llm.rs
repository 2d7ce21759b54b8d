//! Shared LLM client and interaction utilities
//!
//! Provides a common interface for OpenAI API interactions used across services.

use rig::client::EmbeddingsClient;
use rig::providers::openai;

/// Embedding model used for both index builds and query-time retrieval.
/// The two sides must agree or stored vectors become unsearchable.
pub const EMBEDDING_MODEL: &str = openai::TEXT_EMBEDDING_3_SMALL;

/// Shared LLM client wrapper
#[derive(Clone)]
pub struct LlmClient {
    client: openai::Client,
}

impl LlmClient {
    /// Create a new LLM client with the provided API key
    pub fn new(api_key: &str) -> Result<Self, String> {
        let client = openai::Client::builder(api_key)
            .build()
            .map_err(|e| format!("Failed to create OpenAI client: {}", e))?;

        Ok(Self { client })
    }

    /// Get a reference to the underlying OpenAI client
    /// Use this to create agents and extractors with custom configuration
    pub fn openai_client(&self) -> &openai::Client {
        &self.client
    }

    /// Handle for the pinned embedding model
    pub fn embedding_model(&self) -> openai::EmbeddingModel {
        self.client.embedding_model(EMBEDDING_MODEL)
    }
}

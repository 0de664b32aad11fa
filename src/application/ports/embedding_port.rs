use async_trait::async_trait;

use crate::application::services::indexing::IndexingError;

/// Synchronous request/response against the external embedding model.
/// No caching and no retry here; retry policy lives in the outbox layer.
#[async_trait]
pub trait EmbeddingPort: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, IndexingError>;
}

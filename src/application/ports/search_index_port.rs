use async_trait::async_trait;

use crate::application::services::indexing::{IndexingError, PostIndexDocument, RagChunkDocument};

/// Upload ("upsert") access to the two external search indexes. Each call
/// is one batched request; a partial rejection surfaces as a single
/// aggregate failure.
#[async_trait]
pub trait SearchIndexPort: Send + Sync {
    async fn upload_post(&self, doc: &PostIndexDocument) -> Result<(), IndexingError>;

    async fn upload_chunks(&self, docs: &[RagChunkDocument]) -> Result<(), IndexingError>;
}

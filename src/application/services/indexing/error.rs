use thiserror::Error;

/// Failures the indexing pipeline can surface. `Config` and `EmptyInput`
/// are caller bugs; the provider/upload variants are upstream failures
/// the outbox schedules a retry for.
#[derive(Debug, Error)]
pub enum IndexingError {
    #[error("invalid chunking config: overlap {overlap} must be smaller than size {size}")]
    Config { size: usize, overlap: usize },

    #[error("refusing to embed empty text")]
    EmptyInput,

    #[error("embedding provider error: {0}")]
    EmbeddingProvider(String),

    #[error("index upload failed: {0}")]
    IndexUpload(String),
}

use futures_util::future::try_join_all;

use crate::application::ports::embedding_port::EmbeddingPort;
use crate::application::ports::search_index_port::SearchIndexPort;
use crate::application::services::chunking::chunk_windows;
use crate::application::services::extraction::extract_plain_text;
use crate::domain::posts::PostRecord;

use super::documents::{PostIndexDocument, RagChunkDocument};
use super::error::IndexingError;

/// Runs one post through extraction, embedding and both index uploads.
/// Uploads are upserts, so a re-run after a partial failure self-heals.
pub struct IndexPostPipeline<'a> {
    pub embeddings: &'a dyn EmbeddingPort,
    pub index: &'a dyn SearchIndexPort,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl IndexPostPipeline<'_> {
    pub async fn run(&self, post: &PostRecord) -> Result<(), IndexingError> {
        let content_text = extract_plain_text(&post.content);
        if content_text.trim().is_empty() {
            return Err(IndexingError::EmptyInput);
        }

        // Primary index: one document carrying the full-text vector.
        let vector = self.embeddings.embed(&content_text).await?;
        let doc = PostIndexDocument::from_post(post, content_text.clone(), vector);
        self.index.upload_post(&doc).await?;

        // RAG index: chunks are rebuilt fresh on every attempt. Chunk
        // embeddings are independent of each other, so they run concurrently;
        // the batch is only published once all of them completed.
        let chunks: Vec<String> =
            chunk_windows(&content_text, self.chunk_size, self.chunk_overlap)?.collect();
        let vectors = try_join_all(chunks.iter().map(|c| self.embeddings.embed(c))).await?;
        let docs: Vec<RagChunkDocument> = chunks
            .into_iter()
            .zip(vectors)
            .enumerate()
            .map(|(sequence, (chunk, vector))| {
                RagChunkDocument::new(
                    post.id,
                    sequence,
                    chunk,
                    &content_text,
                    post.created_at,
                    vector,
                )
            })
            .collect();
        self.index.upload_chunks(&docs).await?;
        Ok(())
    }
}

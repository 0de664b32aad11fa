use chrono::{Duration, Utc};
use tracing::warn;

use crate::application::ports::embedding_port::EmbeddingPort;
use crate::application::ports::index_outbox_repository::IndexOutboxRepository;
use crate::application::ports::search_index_port::SearchIndexPort;
use crate::application::services::indexing::IndexPostPipeline;
use crate::domain::indexing::IndexingStatus;
use crate::domain::posts::PostRecord;

/// Backoff before a failed registration becomes due again.
pub const RETRY_BACKOFF_SECS: i64 = 600;

/// What the caller gets back. Indexing failure is secondary status, never
/// a reason to fail the post save itself.
#[derive(Debug, Clone)]
pub struct IndexingOutcome {
    pub status: IndexingStatus,
    pub error: Option<String>,
}

/// Runs the pipeline for one post and records the outcome in the outbox.
pub struct IndexPost<'a> {
    pub outbox: &'a dyn IndexOutboxRepository,
    pub embeddings: &'a dyn EmbeddingPort,
    pub index: &'a dyn SearchIndexPort,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl IndexPost<'_> {
    /// The status write happens-after the publish attempt it reports on,
    /// and is best-effort: the outbox row is bookkeeping, not the source
    /// of truth for the response.
    pub async fn execute(&self, post: &PostRecord, attempts: i32) -> IndexingOutcome {
        let pipeline = IndexPostPipeline {
            embeddings: self.embeddings,
            index: self.index,
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
        };
        match pipeline.run(post).await {
            Ok(()) => {
                if let Err(e) = self.outbox.mark_succeeded(post.id, attempts).await {
                    warn!(post_id = post.id, error = ?e, "outbox success write failed");
                }
                IndexingOutcome {
                    status: IndexingStatus::Success,
                    error: None,
                }
            }
            Err(err) => {
                let message = err.to_string();
                let next_retry_at = Utc::now() + Duration::seconds(RETRY_BACKOFF_SECS);
                if let Err(e) = self
                    .outbox
                    .mark_failed(post.id, attempts, next_retry_at, &message)
                    .await
                {
                    warn!(post_id = post.id, error = ?e, "outbox failure write failed");
                }
                IndexingOutcome {
                    status: IndexingStatus::Failed,
                    error: Some(message),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    use crate::application::services::indexing::{
        IndexingError, PostIndexDocument, RagChunkDocument,
    };
    use crate::domain::indexing::IndexOutboxEntry;

    use super::*;

    struct FakeOutbox {
        pub entries: Mutex<Vec<IndexOutboxEntry>>,
    }

    impl FakeOutbox {
        fn new() -> Self {
            Self {
                entries: Mutex::new(Vec::new()),
            }
        }

        fn upsert(&self, entry: IndexOutboxEntry) {
            let mut entries = self.entries.lock().unwrap();
            entries.retain(|e| e.post_id != entry.post_id);
            entries.push(entry);
        }

        fn entry(&self, post_id: i64) -> IndexOutboxEntry {
            self.entries
                .lock()
                .unwrap()
                .iter()
                .find(|e| e.post_id == post_id)
                .cloned()
                .expect("no outbox entry")
        }
    }

    #[async_trait]
    impl IndexOutboxRepository for FakeOutbox {
        async fn enqueue_pending(&self, post_id: i64) -> anyhow::Result<()> {
            self.upsert(IndexOutboxEntry {
                post_id,
                status: IndexingStatus::Pending,
                attempts: 0,
                next_retry_at: None,
                last_error: None,
            });
            Ok(())
        }

        async fn mark_succeeded(&self, post_id: i64, attempts: i32) -> anyhow::Result<()> {
            self.upsert(IndexOutboxEntry {
                post_id,
                status: IndexingStatus::Success,
                attempts,
                next_retry_at: None,
                last_error: None,
            });
            Ok(())
        }

        async fn mark_failed(
            &self,
            post_id: i64,
            attempts: i32,
            next_retry_at: DateTime<Utc>,
            last_error: &str,
        ) -> anyhow::Result<()> {
            self.upsert(IndexOutboxEntry {
                post_id,
                status: IndexingStatus::Failed,
                attempts,
                next_retry_at: Some(next_retry_at),
                last_error: Some(last_error.to_string()),
            });
            Ok(())
        }

        async fn list_due(
            &self,
            now: DateTime<Utc>,
            limit: i64,
        ) -> anyhow::Result<Vec<IndexOutboxEntry>> {
            let entries = self.entries.lock().unwrap();
            Ok(entries
                .iter()
                .filter(|e| {
                    e.status == IndexingStatus::Failed
                        && e.next_retry_at.map(|t| t <= now).unwrap_or(false)
                })
                .take(limit as usize)
                .cloned()
                .collect())
        }
    }

    struct FakeEmbeddings {
        fail_with: Option<String>,
    }

    #[async_trait]
    impl EmbeddingPort for FakeEmbeddings {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, IndexingError> {
            match &self.fail_with {
                Some(message) => Err(IndexingError::EmbeddingProvider(message.clone())),
                None => Ok(vec![text.len() as f32]),
            }
        }
    }

    struct NullIndex;

    #[async_trait]
    impl SearchIndexPort for NullIndex {
        async fn upload_post(&self, _doc: &PostIndexDocument) -> Result<(), IndexingError> {
            Ok(())
        }

        async fn upload_chunks(&self, _docs: &[RagChunkDocument]) -> Result<(), IndexingError> {
            Ok(())
        }
    }

    fn sample_post() -> PostRecord {
        let now = Utc::now();
        PostRecord {
            id: 11,
            title: "t".into(),
            intro: "i".into(),
            content: "plain text body".into(),
            cover_image_url: None,
            author_id: Uuid::nil(),
            view_count: 0,
            like_count: 0,
            created_at: now,
            updated_at: now,
            categories: vec![],
            tags: vec![],
        }
    }

    #[tokio::test]
    async fn success_clears_retry_state() {
        let outbox = FakeOutbox::new();
        outbox.enqueue_pending(11).await.unwrap();
        let embeddings = FakeEmbeddings { fail_with: None };
        let uc = IndexPost {
            outbox: &outbox,
            embeddings: &embeddings,
            index: &NullIndex,
            chunk_size: 1200,
            chunk_overlap: 200,
        };

        let outcome = uc.execute(&sample_post(), 1).await;

        assert_eq!(outcome.status, IndexingStatus::Success);
        assert!(outcome.error.is_none());
        let entry = outbox.entry(11);
        assert_eq!(entry.status, IndexingStatus::Success);
        assert_eq!(entry.attempts, 1);
        assert!(entry.next_retry_at.is_none());
        assert!(entry.last_error.is_none());
    }

    #[tokio::test]
    async fn failure_records_error_and_backoff() {
        let outbox = FakeOutbox::new();
        outbox.enqueue_pending(11).await.unwrap();
        let embeddings = FakeEmbeddings {
            fail_with: Some("quota exceeded".into()),
        };
        let uc = IndexPost {
            outbox: &outbox,
            embeddings: &embeddings,
            index: &NullIndex,
            chunk_size: 1200,
            chunk_overlap: 200,
        };

        let before = Utc::now();
        let outcome = uc.execute(&sample_post(), 1).await;
        let after = Utc::now();

        assert_eq!(outcome.status, IndexingStatus::Failed);
        assert!(outcome.error.as_deref().unwrap().contains("quota exceeded"));
        let entry = outbox.entry(11);
        assert_eq!(entry.status, IndexingStatus::Failed);
        assert_eq!(entry.attempts, 1);
        assert!(entry.last_error.as_deref().unwrap().contains("quota exceeded"));
        let next_retry = entry.next_retry_at.unwrap();
        assert!(next_retry >= before + chrono::Duration::seconds(RETRY_BACKOFF_SECS));
        assert!(next_retry <= after + chrono::Duration::seconds(RETRY_BACKOFF_SECS));
    }
}

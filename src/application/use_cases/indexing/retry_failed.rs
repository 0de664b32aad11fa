use chrono::Utc;
use tracing::{info, warn};

use crate::application::ports::embedding_port::EmbeddingPort;
use crate::application::ports::index_outbox_repository::IndexOutboxRepository;
use crate::application::ports::post_repository::PostRepository;
use crate::application::ports::search_index_port::SearchIndexPort;
use crate::domain::indexing::IndexingStatus;

use super::index_post::IndexPost;

/// Periodic sweep over failed outbox entries whose backoff has elapsed.
/// Re-runs the pipeline with an incremented attempt counter; a failure
/// pushes the entry another backoff window into the future.
pub struct RetryFailedIndexing<'a> {
    pub posts: &'a dyn PostRepository,
    pub outbox: &'a dyn IndexOutboxRepository,
    pub embeddings: &'a dyn EmbeddingPort,
    pub index: &'a dyn SearchIndexPort,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub batch_size: i64,
}

impl RetryFailedIndexing<'_> {
    /// Returns how many entries were re-attempted.
    pub async fn execute(&self) -> anyhow::Result<usize> {
        let due = self.outbox.list_due(Utc::now(), self.batch_size).await?;
        let mut retried = 0;
        for entry in due {
            let Some(post) = self.posts.get_with_taxonomy(entry.post_id).await? else {
                warn!(
                    post_id = entry.post_id,
                    "post missing for failed index entry, skipping"
                );
                continue;
            };
            let indexer = IndexPost {
                outbox: self.outbox,
                embeddings: self.embeddings,
                index: self.index,
                chunk_size: self.chunk_size,
                chunk_overlap: self.chunk_overlap,
            };
            let attempts = entry.attempts + 1;
            let outcome = indexer.execute(&post, attempts).await;
            match outcome.status {
                IndexingStatus::Failed => warn!(
                    post_id = entry.post_id,
                    attempts,
                    error = outcome.error.as_deref().unwrap_or(""),
                    "index retry failed"
                ),
                _ => info!(post_id = entry.post_id, attempts, "index retry succeeded"),
            }
            retried += 1;
        }
        Ok(retried)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{DateTime, Duration, Utc};
    use uuid::Uuid;

    use crate::application::services::indexing::{
        IndexingError, PostIndexDocument, RagChunkDocument,
    };
    use crate::domain::indexing::IndexOutboxEntry;
    use crate::domain::posts::{PostDraft, PostRecord, PostSummary};

    use super::*;

    struct FakeOutbox {
        entries: Mutex<Vec<IndexOutboxEntry>>,
    }

    impl FakeOutbox {
        fn with_failed(post_id: i64, attempts: i32, due_at: DateTime<Utc>) -> Self {
            Self {
                entries: Mutex::new(vec![IndexOutboxEntry {
                    post_id,
                    status: IndexingStatus::Failed,
                    attempts,
                    next_retry_at: Some(due_at),
                    last_error: Some("boom".into()),
                }]),
            }
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
            let mut entries = self.entries.lock().unwrap();
            entries.retain(|e| e.post_id != post_id);
            entries.push(IndexOutboxEntry {
                post_id,
                status: IndexingStatus::Pending,
                attempts: 0,
                next_retry_at: None,
                last_error: None,
            });
            Ok(())
        }

        async fn mark_succeeded(&self, post_id: i64, attempts: i32) -> anyhow::Result<()> {
            let mut entries = self.entries.lock().unwrap();
            entries.retain(|e| e.post_id != post_id);
            entries.push(IndexOutboxEntry {
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
            let mut entries = self.entries.lock().unwrap();
            entries.retain(|e| e.post_id != post_id);
            entries.push(IndexOutboxEntry {
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
            Ok(self
                .entries
                .lock()
                .unwrap()
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

    struct FakePosts {
        post: Option<PostRecord>,
    }

    #[async_trait]
    impl PostRepository for FakePosts {
        async fn create(&self, _draft: &PostDraft) -> anyhow::Result<i64> {
            unimplemented!("not used by the sweep")
        }

        async fn update(&self, _id: i64, _draft: &PostDraft) -> anyhow::Result<bool> {
            unimplemented!("not used by the sweep")
        }

        async fn get_with_taxonomy(&self, _id: i64) -> anyhow::Result<Option<PostRecord>> {
            Ok(self.post.clone())
        }

        async fn list_for_author(&self, _author_id: Uuid) -> anyhow::Result<Vec<PostSummary>> {
            unimplemented!("not used by the sweep")
        }
    }

    struct OkEmbeddings;

    #[async_trait]
    impl EmbeddingPort for OkEmbeddings {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, IndexingError> {
            Ok(vec![text.len() as f32])
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

    fn sample_post(id: i64) -> PostRecord {
        let now = Utc::now();
        PostRecord {
            id,
            title: "t".into(),
            intro: "i".into(),
            content: "body text".into(),
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
    async fn retries_due_entry_and_increments_attempts() {
        let outbox = FakeOutbox::with_failed(5, 1, Utc::now() - Duration::minutes(1));
        let posts = FakePosts {
            post: Some(sample_post(5)),
        };
        let uc = RetryFailedIndexing {
            posts: &posts,
            outbox: &outbox,
            embeddings: &OkEmbeddings,
            index: &NullIndex,
            chunk_size: 1200,
            chunk_overlap: 200,
            batch_size: 10,
        };

        let retried = uc.execute().await.unwrap();

        assert_eq!(retried, 1);
        let entry = outbox.entry(5);
        assert_eq!(entry.status, IndexingStatus::Success);
        assert_eq!(entry.attempts, 2);
        assert!(entry.next_retry_at.is_none());
    }

    #[tokio::test]
    async fn entries_not_yet_due_are_left_alone() {
        let outbox = FakeOutbox::with_failed(5, 1, Utc::now() + Duration::minutes(5));
        let posts = FakePosts {
            post: Some(sample_post(5)),
        };
        let uc = RetryFailedIndexing {
            posts: &posts,
            outbox: &outbox,
            embeddings: &OkEmbeddings,
            index: &NullIndex,
            chunk_size: 1200,
            chunk_overlap: 200,
            batch_size: 10,
        };

        assert_eq!(uc.execute().await.unwrap(), 0);
        assert_eq!(outbox.entry(5).status, IndexingStatus::Failed);
    }

    #[tokio::test]
    async fn missing_post_is_skipped() {
        let outbox = FakeOutbox::with_failed(5, 1, Utc::now() - Duration::minutes(1));
        let posts = FakePosts { post: None };
        let uc = RetryFailedIndexing {
            posts: &posts,
            outbox: &outbox,
            embeddings: &OkEmbeddings,
            index: &NullIndex,
            chunk_size: 1200,
            chunk_overlap: 200,
            batch_size: 10,
        };

        assert_eq!(uc.execute().await.unwrap(), 0);
        // Entry stays failed for a later sweep.
        assert_eq!(outbox.entry(5).status, IndexingStatus::Failed);
    }
}

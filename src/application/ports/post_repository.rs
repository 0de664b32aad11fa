use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::posts::{PostDraft, PostRecord, PostSummary};

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Inserts the post and its category/tag associations, returning the new id.
    async fn create(&self, draft: &PostDraft) -> anyhow::Result<i64>;

    /// Replaces the post body and its associations. Returns false when the
    /// post does not exist.
    async fn update(&self, id: i64, draft: &PostDraft) -> anyhow::Result<bool>;

    async fn get_with_taxonomy(&self, id: i64) -> anyhow::Result<Option<PostRecord>>;

    async fn list_for_author(&self, author_id: Uuid) -> anyhow::Result<Vec<PostSummary>>;
}

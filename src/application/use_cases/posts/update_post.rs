use crate::application::ports::index_outbox_repository::IndexOutboxRepository;
use crate::application::ports::post_repository::PostRepository;
use crate::domain::posts::{PostDraft, PostRecord};

pub struct UpdatePost<'a> {
    pub posts: &'a dyn PostRepository,
    pub outbox: &'a dyn IndexOutboxRepository,
}

impl UpdatePost<'_> {
    /// Replaces the post body and associations, resetting the outbox entry
    /// to `pending` ahead of re-indexing. Returns None when the post does
    /// not exist.
    pub async fn execute(&self, id: i64, draft: &PostDraft) -> anyhow::Result<Option<PostRecord>> {
        if !self.posts.update(id, draft).await? {
            return Ok(None);
        }
        self.outbox.enqueue_pending(id).await?;
        self.posts.get_with_taxonomy(id).await
    }
}

use crate::application::ports::index_outbox_repository::IndexOutboxRepository;
use crate::application::ports::post_repository::PostRepository;
use crate::domain::posts::{PostDraft, PostRecord};

pub struct CreatePost<'a> {
    pub posts: &'a dyn PostRepository,
    pub outbox: &'a dyn IndexOutboxRepository,
}

impl CreatePost<'_> {
    /// Persists the post and its outbox marker. The `pending` entry is
    /// written before any indexing work so a crash here still leaves a
    /// durable trace for the retry sweep.
    pub async fn execute(&self, draft: &PostDraft) -> anyhow::Result<PostRecord> {
        let id = self.posts.create(draft).await?;
        self.outbox.enqueue_pending(id).await?;
        self.posts
            .get_with_taxonomy(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("post {id} vanished after insert"))
    }
}

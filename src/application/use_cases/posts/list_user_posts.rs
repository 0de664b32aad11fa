use uuid::Uuid;

use crate::application::ports::post_repository::PostRepository;
use crate::domain::posts::PostSummary;

pub struct ListUserPosts<'a> {
    pub posts: &'a dyn PostRepository,
}

impl ListUserPosts<'_> {
    pub async fn execute(&self, author_id: Uuid) -> anyhow::Result<Vec<PostSummary>> {
        self.posts.list_for_author(author_id).await
    }
}

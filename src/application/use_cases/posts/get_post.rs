use crate::application::ports::post_repository::PostRepository;
use crate::domain::posts::PostRecord;

pub struct GetPost<'a> {
    pub posts: &'a dyn PostRepository,
}

impl GetPost<'_> {
    pub async fn execute(&self, id: i64) -> anyhow::Result<Option<PostRecord>> {
        self.posts.get_with_taxonomy(id).await
    }
}

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::use_cases::indexing::index_post::IndexPost;
use crate::application::use_cases::posts::create_post::CreatePost;
use crate::application::use_cases::posts::get_post::GetPost;
use crate::application::use_cases::posts::list_user_posts::ListUserPosts;
use crate::application::use_cases::posts::update_post::UpdatePost;
use crate::bootstrap::app_context::AppContext;
use crate::domain::posts::{PostDraft, PostRecord, PostSummary};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SavePostRequest {
    pub title: String,
    #[serde(default)]
    pub intro: String,
    #[serde(default)]
    pub content: String,
    pub cover_image_url: Option<String>,
    pub user_id: Uuid,
    #[serde(default)]
    pub category_ids: Vec<i64>,
    #[serde(default)]
    pub tag_ids: Vec<i64>,
}

impl SavePostRequest {
    fn into_draft(self) -> PostDraft {
        PostDraft {
            title: self.title,
            intro: self.intro,
            content: self.content,
            cover_image_url: self.cover_image_url.filter(|u| !u.is_empty()),
            author_id: self.user_id,
            category_ids: self.category_ids,
            tag_ids: self.tag_ids,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PostView {
    pub id: i64,
    pub title: String,
    pub intro: String,
    pub content: String,
    pub cover_image_url: Option<String>,
    pub user_id: Uuid,
    pub view_count: i64,
    pub like_count: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
}

impl From<PostRecord> for PostView {
    fn from(p: PostRecord) -> Self {
        PostView {
            id: p.id,
            title: p.title,
            intro: p.intro,
            content: p.content,
            cover_image_url: p.cover_image_url,
            user_id: p.author_id,
            view_count: p.view_count,
            like_count: p.like_count,
            created_at: p.created_at,
            updated_at: p.updated_at,
            categories: p.categories,
            tags: p.tags,
        }
    }
}

/// Indexing outcome rides along as secondary status; a failed index
/// registration never fails the save.
#[derive(Debug, Serialize, ToSchema)]
pub struct SavePostResponse {
    pub post: PostView,
    pub indexing_status: String,
    pub indexing_error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PostSummaryView {
    pub id: i64,
    pub title: String,
    pub tags: Vec<String>,
    pub view_count: i64,
    pub like_count: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<PostSummary> for PostSummaryView {
    fn from(p: PostSummary) -> Self {
        PostSummaryView {
            id: p.id,
            title: p.title,
            tags: p.tags,
            view_count: p.view_count,
            like_count: p.like_count,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PostListResponse {
    pub posts: Vec<PostSummaryView>,
}

#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    pub user_id: Uuid,
}

async fn run_indexing(ctx: &AppContext, post: &PostRecord) -> (String, Option<String>) {
    let outbox = ctx.index_outbox();
    let embeddings = ctx.embeddings();
    let index = ctx.search_index();
    let indexer = IndexPost {
        outbox: outbox.as_ref(),
        embeddings: embeddings.as_ref(),
        index: index.as_ref(),
        chunk_size: ctx.cfg.chunk_size,
        chunk_overlap: ctx.cfg.chunk_overlap,
    };
    let outcome = indexer.execute(post, 1).await;
    (outcome.status.as_str().to_string(), outcome.error)
}

#[utoipa::path(post, path = "/api/posts", tag = "Posts",
    request_body = SavePostRequest,
    responses((status = 200, body = SavePostResponse)))]
pub async fn create_post(
    State(ctx): State<AppContext>,
    Json(req): Json<SavePostRequest>,
) -> Result<Json<SavePostResponse>, StatusCode> {
    if req.title.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let draft = req.into_draft();

    let posts = ctx.post_repo();
    let outbox = ctx.index_outbox();
    let uc = CreatePost {
        posts: posts.as_ref(),
        outbox: outbox.as_ref(),
    };
    let post = uc.execute(&draft).await.map_err(|e| {
        error!(error = ?e, "create post failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let (indexing_status, indexing_error) = run_indexing(&ctx, &post).await;
    Ok(Json(SavePostResponse {
        post: post.into(),
        indexing_status,
        indexing_error,
    }))
}

#[utoipa::path(put, path = "/api/posts/{id}", tag = "Posts",
    params(("id" = i64, Path, description = "Post ID")),
    request_body = SavePostRequest,
    responses((status = 200, body = SavePostResponse)))]
pub async fn update_post(
    State(ctx): State<AppContext>,
    Path(id): Path<i64>,
    Json(req): Json<SavePostRequest>,
) -> Result<Json<SavePostResponse>, StatusCode> {
    if req.title.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let draft = req.into_draft();

    let posts = ctx.post_repo();
    let outbox = ctx.index_outbox();
    let uc = UpdatePost {
        posts: posts.as_ref(),
        outbox: outbox.as_ref(),
    };
    let post = uc
        .execute(id, &draft)
        .await
        .map_err(|e| {
            error!(post_id = id, error = ?e, "update post failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    let (indexing_status, indexing_error) = run_indexing(&ctx, &post).await;
    Ok(Json(SavePostResponse {
        post: post.into(),
        indexing_status,
        indexing_error,
    }))
}

#[utoipa::path(get, path = "/api/posts/{id}", tag = "Posts",
    params(("id" = i64, Path, description = "Post ID")),
    responses((status = 200, body = PostView)))]
pub async fn get_post(
    State(ctx): State<AppContext>,
    Path(id): Path<i64>,
) -> Result<Json<PostView>, StatusCode> {
    let posts = ctx.post_repo();
    let uc = GetPost {
        posts: posts.as_ref(),
    };
    let post = uc
        .execute(id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(post.into()))
}

#[utoipa::path(get, path = "/api/posts", tag = "Posts",
    params(("user_id" = Uuid, Query, description = "Author ID")),
    responses((status = 200, body = PostListResponse)))]
pub async fn list_user_posts(
    State(ctx): State<AppContext>,
    Query(q): Query<ListPostsQuery>,
) -> Result<Json<PostListResponse>, StatusCode> {
    let posts = ctx.post_repo();
    let uc = ListUserPosts {
        posts: posts.as_ref(),
    };
    let items = uc
        .execute(q.user_id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(PostListResponse {
        posts: items.into_iter().map(Into::into).collect(),
    }))
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/posts", get(list_user_posts).post(create_post))
        .route("/posts/:id", get(get_post).put(update_post))
        .with_state(ctx)
}

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A stored post with its category/tag display names resolved.
#[derive(Debug, Clone)]
pub struct PostRecord {
    pub id: i64,
    pub title: String,
    pub intro: String,
    /// Raw editor document (structured JSON) or already-plain text.
    pub content: String,
    pub cover_image_url: Option<String>,
    pub author_id: Uuid,
    pub view_count: i64,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
}

/// Write payload for creating or replacing a post.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub intro: String,
    pub content: String,
    pub cover_image_url: Option<String>,
    pub author_id: Uuid,
    pub category_ids: Vec<i64>,
    pub tag_ids: Vec<i64>,
}

#[derive(Debug, Clone)]
pub struct PostSummary {
    pub id: i64,
    pub title: String,
    pub tags: Vec<String>,
    pub view_count: i64,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
}

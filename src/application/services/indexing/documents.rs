use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::domain::posts::PostRecord;

/// Upsert semantics: insert if absent, else overwrite, keyed by document id.
pub const SEARCH_ACTION_UPLOAD: &str = "upload";

/// Whole-post record for the primary (blog) index. Field names follow the
/// index schema; ids are strings because index keys are strings.
#[derive(Debug, Clone, Serialize)]
pub struct PostIndexDocument {
    pub id: String,
    pub title: String,
    pub intro: String,
    /// Extracted plain text, not the raw editor JSON.
    pub content: String,
    pub cover_image_url: String,
    pub user_id: String,
    pub view_count: i64,
    pub like_count: i64,
    pub is_bookmarked: bool,
    pub created_at: String,
    pub updated_at: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub content_vector: Vec<f32>,
    #[serde(rename = "@search.action")]
    pub search_action: &'static str,
}

impl PostIndexDocument {
    pub fn from_post(post: &PostRecord, content_text: String, content_vector: Vec<f32>) -> Self {
        Self {
            id: post.id.to_string(),
            title: post.title.clone(),
            intro: post.intro.clone(),
            content: content_text,
            cover_image_url: post.cover_image_url.clone().unwrap_or_default(),
            user_id: post.author_id.to_string(),
            view_count: post.view_count,
            like_count: post.like_count,
            // Bookmark state is per-reader; the index carries the neutral default.
            is_bookmarked: false,
            created_at: iso8601(post.created_at),
            updated_at: iso8601(post.updated_at),
            categories: post.categories.clone(),
            tags: post.tags.clone(),
            content_vector,
            search_action: SEARCH_ACTION_UPLOAD,
        }
    }
}

/// One chunk document for the RAG index, keyed `"{post_id}_{sequence}"`.
#[derive(Debug, Clone, Serialize)]
pub struct RagChunkDocument {
    pub doc_id: String,
    pub chunk: String,
    pub full_text: String,
    pub source: &'static str,
    pub section: &'static str,
    pub created_at: String,
    pub content_vector: Vec<f32>,
    #[serde(rename = "@search.action")]
    pub search_action: &'static str,
}

impl RagChunkDocument {
    pub fn new(
        post_id: i64,
        sequence: usize,
        chunk: String,
        full_text: &str,
        created_at: DateTime<Utc>,
        content_vector: Vec<f32>,
    ) -> Self {
        Self {
            doc_id: format!("{post_id}_{sequence}"),
            chunk,
            full_text: full_text.to_string(),
            source: "blog",
            section: "",
            created_at: iso8601(created_at),
            content_vector,
            search_action: SEARCH_ACTION_UPLOAD,
        }
    }
}

fn iso8601(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

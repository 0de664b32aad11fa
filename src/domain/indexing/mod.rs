use chrono::{DateTime, Utc};

/// Lifecycle of one post's search-index registration.
/// `Pending` is written before the first attempt; a crash between post
/// creation and indexing leaves a durable marker rather than silence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexingStatus {
    Pending,
    Success,
    Failed,
}

impl IndexingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexingStatus::Pending => "pending",
            IndexingStatus::Success => "success",
            IndexingStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(IndexingStatus::Pending),
            "success" => Some(IndexingStatus::Success),
            "failed" => Some(IndexingStatus::Failed),
            _ => None,
        }
    }
}

/// One row of indexing bookkeeping per post. Diagnostic, not
/// authoritative: concurrent attempts for the same post are
/// last-writer-wins.
#[derive(Debug, Clone)]
pub struct IndexOutboxEntry {
    pub post_id: i64,
    pub status: IndexingStatus,
    pub attempts: i32,
    pub next_retry_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

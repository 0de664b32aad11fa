use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::indexing::IndexOutboxEntry;

#[async_trait]
pub trait IndexOutboxRepository: Send + Sync {
    /// Inserts (or resets) the post's entry to `pending`. Called strictly
    /// before the indexing attempt begins.
    async fn enqueue_pending(&self, post_id: i64) -> anyhow::Result<()>;

    /// `success`: clears `next_retry_at` and `last_error`.
    async fn mark_succeeded(&self, post_id: i64, attempts: i32) -> anyhow::Result<()>;

    /// `failed`: records the error and the backoff deadline.
    async fn mark_failed(
        &self,
        post_id: i64,
        attempts: i32,
        next_retry_at: DateTime<Utc>,
        last_error: &str,
    ) -> anyhow::Result<()>;

    /// Failed entries whose backoff deadline has elapsed, oldest first.
    async fn list_due(
        &self,
        now: DateTime<Utc>,
        limit: i64,
    ) -> anyhow::Result<Vec<IndexOutboxEntry>>;
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;

use crate::application::ports::index_outbox_repository::IndexOutboxRepository;
use crate::domain::indexing::{IndexOutboxEntry, IndexingStatus};
use crate::infrastructure::db::PgPool;

pub struct SqlxIndexOutboxRepository {
    pub pool: PgPool,
}

impl SqlxIndexOutboxRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IndexOutboxRepository for SqlxIndexOutboxRepository {
    async fn enqueue_pending(&self, post_id: i64) -> anyhow::Result<()> {
        // Re-enqueue keeps the attempt counter as diagnostic history.
        sqlx::query(
            r#"INSERT INTO index_queue (post_id, status)
               VALUES ($1, 'pending')
               ON CONFLICT (post_id) DO UPDATE
               SET status = 'pending', next_retry_at = NULL, last_error = NULL, updated_at = now()"#,
        )
        .bind(post_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn mark_succeeded(&self, post_id: i64, attempts: i32) -> anyhow::Result<()> {
        sqlx::query(
            r#"UPDATE index_queue
               SET status = 'success', attempts = $2, next_retry_at = NULL,
                   last_error = NULL, updated_at = now()
               WHERE post_id = $1"#,
        )
        .bind(post_id)
        .bind(attempts)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn mark_failed(
        &self,
        post_id: i64,
        attempts: i32,
        next_retry_at: DateTime<Utc>,
        last_error: &str,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"UPDATE index_queue
               SET status = 'failed', attempts = $2, next_retry_at = $3,
                   last_error = $4, updated_at = now()
               WHERE post_id = $1"#,
        )
        .bind(post_id)
        .bind(attempts)
        .bind(next_retry_at)
        .bind(last_error)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_due(
        &self,
        now: DateTime<Utc>,
        limit: i64,
    ) -> anyhow::Result<Vec<IndexOutboxEntry>> {
        let rows = sqlx::query(
            r#"SELECT post_id, status, attempts, next_retry_at, last_error
               FROM index_queue
               WHERE status = 'failed' AND next_retry_at IS NOT NULL AND next_retry_at <= $1
               ORDER BY next_retry_at ASC
               LIMIT $2"#,
        )
        .bind(now)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(|r| {
                let status: String = r.get("status");
                let status = IndexingStatus::parse(&status)
                    .ok_or_else(|| anyhow::anyhow!("unknown indexing status: {status}"))?;
                Ok(IndexOutboxEntry {
                    post_id: r.get("post_id"),
                    status,
                    attempts: r.get("attempts"),
                    next_retry_at: r.get("next_retry_at"),
                    last_error: r.get("last_error"),
                })
            })
            .collect()
    }
}

use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::{Postgres, Row, Transaction};
use uuid::Uuid;

use crate::application::ports::post_repository::PostRepository;
use crate::domain::posts::{PostDraft, PostRecord, PostSummary};
use crate::infrastructure::db::PgPool;

pub struct SqlxPostRepository {
    pub pool: PgPool,
}

impl SqlxPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn replace_taxonomy(
    tx: &mut Transaction<'_, Postgres>,
    post_id: i64,
    category_ids: &[i64],
    tag_ids: &[i64],
) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM post_categories WHERE post_id = $1")
        .bind(post_id)
        .execute(&mut **tx)
        .await?;
    sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
        .bind(post_id)
        .execute(&mut **tx)
        .await?;
    for category_id in category_ids.iter().collect::<BTreeSet<_>>() {
        sqlx::query(
            "INSERT INTO post_categories (post_id, category_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(post_id)
        .bind(category_id)
        .execute(&mut **tx)
        .await?;
    }
    for tag_id in tag_ids.iter().collect::<BTreeSet<_>>() {
        sqlx::query("INSERT INTO post_tags (post_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(post_id)
            .bind(tag_id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

#[async_trait]
impl PostRepository for SqlxPostRepository {
    async fn create(&self, draft: &PostDraft) -> anyhow::Result<i64> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(
            r#"INSERT INTO posts (title, intro, content, cover_image_url, author_id)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id"#,
        )
        .bind(&draft.title)
        .bind(&draft.intro)
        .bind(&draft.content)
        .bind(&draft.cover_image_url)
        .bind(draft.author_id)
        .fetch_one(&mut *tx)
        .await?;
        let id: i64 = row.get("id");
        replace_taxonomy(&mut tx, id, &draft.category_ids, &draft.tag_ids).await?;
        tx.commit().await?;
        Ok(id)
    }

    async fn update(&self, id: i64, draft: &PostDraft) -> anyhow::Result<bool> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            r#"UPDATE posts
               SET title = $2, intro = $3, content = $4, cover_image_url = $5, updated_at = now()
               WHERE id = $1"#,
        )
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.intro)
        .bind(&draft.content)
        .bind(&draft.cover_image_url)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }
        replace_taxonomy(&mut tx, id, &draft.category_ids, &draft.tag_ids).await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn get_with_taxonomy(&self, id: i64) -> anyhow::Result<Option<PostRecord>> {
        let row = sqlx::query(
            r#"SELECT p.id, p.title, p.intro, p.content, p.cover_image_url, p.author_id,
                      p.view_count, p.like_count, p.created_at, p.updated_at,
                      COALESCE(array_agg(DISTINCT c.name) FILTER (WHERE c.name IS NOT NULL), '{}') AS categories,
                      COALESCE(array_agg(DISTINCT t.name) FILTER (WHERE t.name IS NOT NULL), '{}') AS tags
               FROM posts p
               LEFT JOIN post_categories pc ON pc.post_id = p.id
               LEFT JOIN categories c ON c.id = pc.category_id
               LEFT JOIN post_tags pt ON pt.post_id = p.id
               LEFT JOIN tags t ON t.id = pt.tag_id
               WHERE p.id = $1
               GROUP BY p.id"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| PostRecord {
            id: r.get("id"),
            title: r.get("title"),
            intro: r.get("intro"),
            content: r.get("content"),
            cover_image_url: r.get("cover_image_url"),
            author_id: r.get("author_id"),
            view_count: r.get("view_count"),
            like_count: r.get("like_count"),
            created_at: r.get("created_at"),
            updated_at: r.get("updated_at"),
            categories: r.get::<Vec<String>, _>("categories"),
            tags: r.get::<Vec<String>, _>("tags"),
        }))
    }

    async fn list_for_author(&self, author_id: Uuid) -> anyhow::Result<Vec<PostSummary>> {
        let rows = sqlx::query(
            r#"SELECT p.id, p.title, p.view_count, p.like_count, p.created_at,
                      COALESCE(array_agg(t.name) FILTER (WHERE t.name IS NOT NULL), '{}') AS tags
               FROM posts p
               LEFT JOIN post_tags pt ON pt.post_id = p.id
               LEFT JOIN tags t ON t.id = pt.tag_id
               WHERE p.author_id = $1
               GROUP BY p.id
               ORDER BY p.created_at DESC"#,
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|r| PostSummary {
                id: r.get("id"),
                title: r.get("title"),
                tags: r.get::<Vec<String>, _>("tags"),
                view_count: r.get("view_count"),
                like_count: r.get("like_count"),
                created_at: r.get("created_at"),
            })
            .collect())
    }
}

pub mod index_outbox_repository_sqlx;
pub mod post_repository_sqlx;

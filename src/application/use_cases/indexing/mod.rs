pub mod index_post;
pub mod retry_failed;

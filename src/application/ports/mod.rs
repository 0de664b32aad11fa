pub mod embedding_port;
pub mod index_outbox_repository;
pub mod post_repository;
pub mod search_index_port;

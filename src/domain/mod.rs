pub mod indexing;
pub mod posts;

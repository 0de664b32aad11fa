pub mod chunking;
pub mod extraction;
pub mod indexing;

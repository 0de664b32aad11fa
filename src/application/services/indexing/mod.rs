mod documents;
mod error;
mod pipeline;

pub use documents::{PostIndexDocument, RagChunkDocument, SEARCH_ACTION_UPLOAD};
pub use error::IndexingError;
pub use pipeline::IndexPostPipeline;
